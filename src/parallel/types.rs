//! Type definitions for parallel processing
//!
//! Contains configuration and the messages exchanged between pipeline threads.

use crossbeam_channel::Sender;

use crate::decoder::{Batch, DecodeOutcome};
use crate::error::PipelineError;
use crate::platform::CancellationToken;
use crate::stats::AggregateState;

/// Configuration for parallel processing
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    pub num_workers: usize,
    pub batch_size: usize,
    /// Capacity of the batch queue in batches; `None` leaves it unbounded.
    pub buffer_size: Option<usize>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
            batch_size: 1000,
            buffer_size: Some(64),
        }
    }
}

/// Configuration for the decoder thread
pub(crate) struct DecoderThreadConfig {
    pub batch_sender: Sender<Batch>,
    pub batch_size: usize,
    pub cancel: CancellationToken,
    /// Raised by the combiner when a worker failed and the run is doomed.
    pub abort: CancellationToken,
}

/// Final message from a worker; each worker sends exactly one.
#[derive(Debug)]
pub(crate) enum WorkerMessage {
    Finished {
        worker_id: usize,
        state: AggregateState,
        batches: usize,
    },
    Failed {
        worker_id: usize,
        error: PipelineError,
    },
}

/// Merged state of a run together with how decoding ended.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub state: AggregateState,
    pub outcome: DecodeOutcome,
}

impl PipelineRun {
    pub fn is_cancelled(&self) -> bool {
        matches!(self.outcome, DecodeOutcome::Cancelled { .. })
    }
}
