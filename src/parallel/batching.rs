//! Decoder thread for parallel processing
//!
//! Streams the input array into fixed-size batches and feeds the shared
//! batch queue.

use std::io::{BufReader, Read};

use crate::decoder::{BatchStream, DecodeOutcome};
use crate::error::{PipelineError, Result};

use super::types::DecoderThreadConfig;

const READ_BUFFER_CAPACITY: usize = 64 * 1024;

/// Decoder thread - the single producer of the batch queue.
///
/// Returns `Ok(None)` when it stopped early because the rest of the pipeline
/// already failed; the failure itself is reported by the combiner. Dropping
/// `batch_sender` on return closes the queue for the workers.
pub(crate) fn decoder_thread<R: Read>(
    reader: R,
    config: DecoderThreadConfig,
) -> Result<Option<DecodeOutcome>> {
    let reader = BufReader::with_capacity(READ_BUFFER_CAPACITY, reader);
    let mut stream = BatchStream::new(reader, config.batch_size, config.cancel);

    for batch in stream.by_ref() {
        let batch = batch?;
        if config.abort.is_cancelled() {
            tracing::debug!(batch_id = batch.id, "pipeline aborted, decoder stopping");
            return Ok(None);
        }
        tracing::trace!(batch_id = batch.id, records = batch.len(), "batch ready");
        if config.batch_sender.send(batch).is_err() {
            tracing::debug!("all workers exited, decoder stopping");
            return Ok(None);
        }
    }

    let outcome = stream.outcome().ok_or_else(|| {
        PipelineError::format(0, "decoder stopped without reaching the end of the array")
    })?;
    match outcome {
        DecodeOutcome::Completed { records, batches } => {
            tracing::debug!(records, batches, "decoder reached end of input");
        }
        DecodeOutcome::Cancelled { records, batches } => {
            tracing::warn!(records, batches, "decoder stopped by cancellation");
        }
    }
    Ok(Some(outcome))
}
