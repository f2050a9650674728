//! Fan-in of worker results
//!
//! Receives the single final message of every worker and merges the partial
//! states. The result channel closes only once every worker has dropped its
//! sender, so draining it is the same as waiting for all workers.

use crossbeam_channel::Receiver;

use crate::error::{PipelineError, Result};
use crate::platform::CancellationToken;
use crate::stats::AggregateState;

use super::types::WorkerMessage;

/// Combiner thread: merges worker states in arrival order
pub(crate) fn combiner_thread(
    result_receiver: Receiver<WorkerMessage>,
    expected_workers: usize,
    cancel: CancellationToken,
    abort: CancellationToken,
) -> Result<AggregateState> {
    let mut merged = AggregateState::new();
    let mut first_error: Option<PipelineError> = None;
    let mut reported = 0usize;

    for message in result_receiver.iter() {
        reported += 1;
        match message {
            WorkerMessage::Finished {
                worker_id, state, ..
            } => {
                if cancel.is_cancelled() {
                    tracing::debug!(worker_id, rows = state.rows_processed, "merging partial state");
                }
                merged.merge(state);
            }
            WorkerMessage::Failed { worker_id, error } => {
                tracing::warn!(worker_id, %error, "worker failed, aborting run");
                abort.cancel();
                first_error.get_or_insert(error);
            }
        }
    }

    if let Some(error) = first_error {
        return Err(error);
    }
    if reported != expected_workers {
        return Err(PipelineError::WorkerPanicked {
            thread: format!("{} of {} worker", expected_workers - reported, expected_workers),
        });
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn state(rows: usize, recipe: &str) -> AggregateState {
        let mut state = AggregateState::new();
        state.recipe_counts.insert(recipe.to_string(), rows);
        state.postcode_counts.insert("10120".to_string(), rows);
        state.rows_processed = rows;
        state
    }

    #[test]
    fn test_merges_all_workers() {
        let (sender, receiver) = unbounded();
        for (worker_id, rows) in [(0, 2), (1, 3), (2, 0)] {
            sender
                .send(WorkerMessage::Finished {
                    worker_id,
                    state: state(rows, "Lamb"),
                    batches: 1,
                })
                .unwrap();
        }
        drop(sender);

        let merged = combiner_thread(
            receiver,
            3,
            CancellationToken::new(),
            CancellationToken::new(),
        )
        .unwrap();
        assert_eq!(merged.rows_processed, 5);
        assert_eq!(merged.recipe_counts["Lamb"], 5);
        assert_eq!(merged.postcode_counts["10120"], 5);
    }

    #[test]
    fn test_failure_raises_abort_and_is_returned() {
        let (sender, receiver) = unbounded();
        let abort = CancellationToken::new();
        sender
            .send(WorkerMessage::Failed {
                worker_id: 1,
                error: PipelineError::Parse {
                    input: "9 - 11AM".to_string(),
                    reason: "missing marker".to_string(),
                },
            })
            .unwrap();
        sender
            .send(WorkerMessage::Finished {
                worker_id: 0,
                state: state(1, "Lamb"),
                batches: 1,
            })
            .unwrap();
        drop(sender);

        let err = combiner_thread(receiver, 2, CancellationToken::new(), abort.clone())
            .unwrap_err();
        assert!(matches!(err, PipelineError::Parse { .. }));
        assert!(abort.is_cancelled());
    }

    #[test]
    fn test_missing_worker_report_is_an_error() {
        let (sender, receiver) = unbounded::<WorkerMessage>();
        drop(sender);
        let err = combiner_thread(
            receiver,
            2,
            CancellationToken::new(),
            CancellationToken::new(),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::WorkerPanicked { .. }));
    }
}
