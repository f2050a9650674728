//! Worker thread for parallel processing
//!
//! Each worker drains batches from the shared queue into a private
//! [`AggregateState`] and reports it once the queue is closed and empty.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use crate::decoder::Batch;
use crate::search::SearchConfig;
use crate::stats::AggregateState;

use super::types::WorkerMessage;

/// Worker thread: accumulates batches until the decoder closes the queue
pub(crate) fn worker_thread(
    worker_id: usize,
    batch_receiver: Receiver<Batch>,
    result_sender: Sender<WorkerMessage>,
    search: Arc<SearchConfig>,
) {
    let mut state = AggregateState::new();
    let mut batches = 0usize;

    for batch in batch_receiver.iter() {
        if let Err(error) = state.observe_all(&batch.records, &search) {
            tracing::debug!(worker_id, batch_id = batch.id, %error, "worker failed");
            let _ = result_sender.send(WorkerMessage::Failed { worker_id, error });
            return;
        }
        batches += 1;
    }

    tracing::debug!(
        worker_id,
        batches,
        rows = state.rows_processed,
        "worker finished"
    );
    let _ = result_sender.send(WorkerMessage::Finished {
        worker_id,
        state,
        batches,
    });
}
