//! Main parallel processor
//!
//! Contains the ParallelProcessor struct that orchestrates the parallel pipeline:
//! one decoder thread, `num_workers` worker threads and one combiner thread.

use crossbeam_channel::{bounded, unbounded};
use std::io::Read;
use std::sync::Arc;
use std::thread;

use crate::error::{PipelineError, Result};
use crate::platform::CancellationToken;
use crate::search::SearchConfig;

use super::batching::decoder_thread;
use super::combiner::combiner_thread;
use super::types::{DecoderThreadConfig, ParallelConfig, PipelineRun};
use super::worker::worker_thread;

/// Main parallel processor
pub struct ParallelProcessor {
    config: ParallelConfig,
}

impl ParallelProcessor {
    pub fn new(config: ParallelConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline over `reader` and return the merged state.
    ///
    /// A decoding or window parse failure anywhere aborts the whole run. A
    /// cancellation request is not an error here: the returned run carries a
    /// `Cancelled` outcome and the state of every batch that was handed to a
    /// worker before the stop.
    pub fn process<R: Read + Send + 'static>(
        &self,
        reader: R,
        search: Arc<SearchConfig>,
        cancel: &CancellationToken,
    ) -> Result<PipelineRun> {
        let num_workers = self.config.num_workers.max(1);

        let (batch_sender, batch_receiver) = if let Some(size) = self.config.buffer_size {
            bounded(size)
        } else {
            unbounded()
        };
        let (result_sender, result_receiver) = bounded(num_workers);
        let abort = CancellationToken::new();

        tracing::debug!(
            workers = num_workers,
            batch_size = self.config.batch_size,
            queue = ?self.config.buffer_size,
            "starting parallel pipeline"
        );

        let decoder_handle = {
            let config = DecoderThreadConfig {
                batch_sender,
                batch_size: self.config.batch_size,
                cancel: cancel.clone(),
                abort: abort.clone(),
            };
            thread::spawn(move || decoder_thread(reader, config))
        };

        // Start worker threads
        let mut worker_handles = Vec::with_capacity(num_workers);
        for worker_id in 0..num_workers {
            let batch_receiver = batch_receiver.clone();
            let result_sender = result_sender.clone();
            let search = Arc::clone(&search);
            worker_handles.push(thread::spawn(move || {
                worker_thread(worker_id, batch_receiver, result_sender, search)
            }));
        }

        // Drop our copies so the queues close when their owners finish
        drop(batch_receiver);
        drop(result_sender);

        let combiner_handle = {
            let cancel = cancel.clone();
            let abort = abort.clone();
            thread::spawn(move || combiner_thread(result_receiver, num_workers, cancel, abort))
        };

        // Wait for all threads to complete
        let decoded = decoder_handle.join().map_err(|_| PipelineError::WorkerPanicked {
            thread: "decoder".to_string(),
        });
        let mut panicked_worker = None;
        for (idx, handle) in worker_handles.into_iter().enumerate() {
            if handle.join().is_err() {
                panicked_worker.get_or_insert(idx);
            }
        }
        let combined = combiner_handle.join().map_err(|_| PipelineError::WorkerPanicked {
            thread: "combiner".to_string(),
        });

        if let Some(idx) = panicked_worker {
            return Err(PipelineError::WorkerPanicked {
                thread: format!("worker {idx}"),
            });
        }

        let outcome = decoded??;
        let state = combined??;
        let outcome = outcome.ok_or_else(|| PipelineError::WorkerPanicked {
            thread: "worker".to_string(),
        })?;

        tracing::debug!(rows = state.rows_processed, ?outcome, "parallel pipeline finished");
        Ok(PipelineRun { state, outcome })
    }
}
