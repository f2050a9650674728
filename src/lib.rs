// Core library for the recipe-stats fixture analyser

use std::io::Read;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub mod cli;
pub mod config;
pub mod decoder;
pub mod error;
pub mod output;
pub mod parallel;
pub mod platform;
pub mod record;
pub mod report;
pub mod search;
pub mod sequential;
pub mod stats;
pub mod window;

pub use config::{SearchOptions, StatsConfig};
pub use error::{PipelineError, Result};
pub use parallel::{ParallelConfig, ParallelProcessor, PipelineRun};
pub use platform::CancellationToken;
pub use record::Record;
pub use report::{build_report, Report};
pub use search::SearchConfig;
pub use stats::AggregateState;

/// A completed run.
#[derive(Debug, Clone)]
pub struct StatsOutcome {
    pub report: Report,
    pub rows_processed: usize,
    pub elapsed: Duration,
}

/// Aggregate a JSON array of delivery records with the parallel pipeline.
///
/// Cancellation is reported as [`PipelineError::Cancelled`], which carries
/// the report for the rows processed before the stop.
pub fn process_stream<R: Read + Send + 'static>(
    reader: R,
    config: &StatsConfig,
    cancel: &CancellationToken,
) -> Result<StatsOutcome> {
    config.validate()?;
    let search = Arc::new(SearchConfig::from_options(&config.search)?);
    let start = Instant::now();
    let run = ParallelProcessor::new(config.parallel.clone()).process(
        reader,
        Arc::clone(&search),
        cancel,
    )?;
    finish_run(run, &search, start)
}

/// Same as [`process_stream`], but decodes and aggregates on the calling
/// thread.
pub fn process_stream_sequential<R: Read>(
    reader: R,
    config: &StatsConfig,
    cancel: &CancellationToken,
) -> Result<StatsOutcome> {
    config.validate()?;
    let search = SearchConfig::from_options(&config.search)?;
    let start = Instant::now();
    let run = sequential::process_sequential(reader, &search, config.parallel.batch_size, cancel)?;
    finish_run(run, &search, start)
}

fn finish_run(run: PipelineRun, search: &SearchConfig, start: Instant) -> Result<StatsOutcome> {
    debug_assert_eq!(run.state.total_recipe_count(), run.state.rows_processed);
    let report = build_report(&run.state, search);
    let rows_processed = run.state.rows_processed;

    if run.is_cancelled() {
        tracing::warn!(rows_processed, "run cancelled, report is partial");
        return Err(PipelineError::Cancelled {
            partial: Box::new(report),
            rows_processed,
        });
    }

    let elapsed = start.elapsed();
    tracing::info!(
        rows_processed,
        elapsed_ms = elapsed.as_millis() as u64,
        "{}",
        run.state.format_stats()
    );
    Ok(StatsOutcome {
        report,
        rows_processed,
        elapsed,
    })
}
