//! Error kinds surfaced by the aggregation pipeline.

use std::io;

use serde_json::error::Category;
use thiserror::Error;

use crate::report::Report;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input is not a JSON array of delivery records.
    #[error("invalid fixture format at record {index}: {message}")]
    Format { index: usize, message: String },

    /// A delivery window string could not be parsed.
    #[error("invalid delivery window {input:?}: {reason}")]
    Parse { input: String, reason: String },

    /// Processing was stopped by a cancellation request. `partial` reflects
    /// only the records that were processed before the stop.
    #[error("processing cancelled after {rows_processed} rows")]
    Cancelled {
        partial: Box<Report>,
        rows_processed: usize,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{thread} thread panicked")]
    WorkerPanicked { thread: String },
}

impl PipelineError {
    pub(crate) fn format(index: usize, message: impl Into<String>) -> Self {
        PipelineError::Format {
            index,
            message: message.into(),
        }
    }

    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        PipelineError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Map a decoding failure for the element at `index`. Read failures from
    /// the underlying stream keep their original `io::Error`.
    pub(crate) fn from_json(index: usize, err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Io => PipelineError::Io(err.into()),
            Category::Syntax | Category::Data | Category::Eof => {
                PipelineError::format(index, err.to_string())
            }
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, PipelineError::Cancelled { .. })
    }
}
