//! Single-threaded processing on the calling thread.
//!
//! Uses the same decoder, accumulation and cancellation rules as the
//! parallel pipeline, which makes it the reference the parallel results are
//! checked against.

use std::io::{BufReader, Read};

use crate::decoder::BatchStream;
use crate::error::{PipelineError, Result};
use crate::parallel::PipelineRun;
use crate::platform::CancellationToken;
use crate::search::SearchConfig;
use crate::stats::AggregateState;

pub fn process_sequential<R: Read>(
    reader: R,
    search: &SearchConfig,
    batch_size: usize,
    cancel: &CancellationToken,
) -> Result<PipelineRun> {
    let mut stream = BatchStream::new(BufReader::new(reader), batch_size, cancel.clone());
    let mut state = AggregateState::new();

    for batch in stream.by_ref() {
        state.observe_all(&batch?.records, search)?;
    }

    let outcome = stream.outcome().ok_or_else(|| {
        PipelineError::format(
            state.rows_processed,
            "decoder stopped without reaching the end of the array",
        )
    })?;
    Ok(PipelineRun { state, outcome })
}
