use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

use recipe_stats::cli::Cli;
use recipe_stats::output::{render_report, write_report};
use recipe_stats::platform::{CancellationToken, ExitCode, SafeStdout, SignalHandler};
use recipe_stats::{
    process_stream, process_stream_sequential, PipelineError, StatsConfig, StatsOutcome,
};

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    let cancel = CancellationToken::new();
    let signal_handler = match SignalHandler::new(cancel.clone()) {
        Ok(handler) => Some(handler),
        Err(e) => {
            tracing::warn!(error = %e, "signal handling unavailable, Ctrl-C will not stop gracefully");
            None
        }
    };

    match run(&cli, &cancel) {
        Ok(()) => ExitCode::Success.exit(),
        Err(e) => {
            match e.downcast_ref::<PipelineError>() {
                Some(PipelineError::Cancelled { rows_processed, .. }) => {
                    eprintln!(
                        "⚠️  Cancelled after {} rows; partial results were not written",
                        rows_processed
                    );
                    signal_handler
                        .map(|h| h.exit_code())
                        .unwrap_or(ExitCode::SignalInt)
                        .exit();
                }
                Some(PipelineError::Config(_)) => {
                    eprintln!("❌ {:#}", e);
                    ExitCode::InvalidUsage.exit();
                }
                _ => {
                    eprintln!("❌ {:#}", e);
                    ExitCode::GeneralError.exit();
                }
            }
        }
    }
}

fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: &Cli, cancel: &CancellationToken) -> Result<()> {
    let config = cli.to_config();
    tracing::info!(
        file = %cli.file,
        postcode = %config.search.postcode,
        time_window = %config.search.time_window,
        search = ?config.search.effective_words(),
        workers = config.parallel.num_workers,
        batch_size = config.parallel.batch_size,
        "processing recipe fixtures"
    );

    let outcome = if cli.file == "-" {
        process(io::stdin(), &config, cli.sequential, cancel)?
    } else {
        let file = File::open(&cli.file)
            .with_context(|| format!("Failed to open fixture file '{}'", cli.file))?;
        process(file, &config, cli.sequential, cancel)?
    };

    tracing::info!(
        "Process complete: {} rows processed in {:?}",
        outcome.rows_processed,
        outcome.elapsed
    );

    if !cli.no_output_file {
        write_report(&outcome.report, &cli.output)
            .with_context(|| format!("Failed to write report to '{}'", cli.output.display()))?;
        tracing::info!(output = %cli.output.display(), "report written");
    }

    if !cli.quiet {
        let rendered = render_report(&outcome.report)?;
        SafeStdout::new().write_str(&rendered)?;
    }

    Ok(())
}

fn process<R: Read + Send + 'static>(
    reader: R,
    config: &StatsConfig,
    sequential: bool,
    cancel: &CancellationToken,
) -> recipe_stats::Result<StatsOutcome> {
    if sequential {
        process_stream_sequential(reader, config, cancel)
    } else {
        process_stream(reader, config, cancel)
    }
}
