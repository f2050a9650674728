// CLI-specific types and structures
// This module contains the command-line interface definitions and their
// translation into a StatsConfig

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::{SearchOptions, StatsConfig, DEFAULT_POSTCODE, DEFAULT_TIME_WINDOW};
use crate::parallel::ParallelConfig;

pub const DEFAULT_INPUT_FILE: &str = "calculation_fixtures.json";
pub const DEFAULT_OUTPUT_FILE: &str = "result.json";

// CLI structure - contains all command-line arguments and options
#[derive(Parser, Debug, Clone)]
#[command(name = "recipe-stats")]
#[command(about = "Aggregate recipe delivery fixtures into a JSON statistics report")]
#[command(
    long_about = "Aggregate recipe delivery fixtures into a JSON statistics report\n\nThe input is a JSON array of {\"postcode\", \"recipe\", \"delivery\"} objects. It is\nstreamed, never loaded whole, and split across worker threads.\n\nEXAMPLES:\n  recipe-stats -f fixtures.json\n  recipe-stats -f fixtures.json --postcode 10224 --time-window \"10AM - 3PM\"\n  recipe-stats -f - --search Chicken Lamb < fixtures.json"
)]
#[command(version)]
pub struct Cli {
    /// Input fixture file ("-" reads stdin)
    #[arg(
        short = 'f',
        long = "file",
        default_value = DEFAULT_INPUT_FILE,
        help_heading = "Input Options"
    )]
    pub file: String,

    /// File the report is written to
    #[arg(
        short = 'o',
        long = "output",
        default_value = DEFAULT_OUTPUT_FILE,
        help_heading = "Output Options"
    )]
    pub output: PathBuf,

    /// Do not write the report file
    #[arg(long = "no-output-file", help_heading = "Output Options")]
    pub no_output_file: bool,

    /// Do not echo the report on stdout
    #[arg(short = 'q', long = "quiet", help_heading = "Output Options")]
    pub quiet: bool,

    /// Postcode counted in count_per_postcode_and_time
    #[arg(long = "postcode", default_value = DEFAULT_POSTCODE, help_heading = "Search Options")]
    pub postcode: String,

    /// Delivery window counted in count_per_postcode_and_time, e.g. "9AM - 4PM"
    #[arg(
        long = "time-window",
        default_value = DEFAULT_TIME_WINDOW,
        help_heading = "Search Options"
    )]
    pub time_window: String,

    /// Words matched case-insensitively against recipe names (default: Potato Veggie Mushroom)
    #[arg(
        long = "search",
        value_name = "WORD",
        num_args = 1..,
        help_heading = "Search Options"
    )]
    pub search: Vec<String>,

    /// Number of worker threads (0 = number of CPUs)
    #[arg(long = "threads", default_value_t = 0, help_heading = "Performance Options")]
    pub threads: usize,

    /// Records per batch handed to a worker
    #[arg(long = "batch-size", default_value_t = 1000, help_heading = "Performance Options")]
    pub batch_size: usize,

    /// Maximum number of batches waiting for a worker
    #[arg(long = "queue-size", help_heading = "Performance Options")]
    pub queue_size: Option<usize>,

    /// Decode and aggregate on a single thread
    #[arg(long = "sequential", help_heading = "Performance Options")]
    pub sequential: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, help_heading = "Logging Options")]
    pub verbose: u8,
}

impl Cli {
    pub fn to_config(&self) -> StatsConfig {
        let defaults = ParallelConfig::default();
        let num_workers = if self.threads == 0 {
            defaults.num_workers
        } else {
            self.threads
        };

        StatsConfig {
            search: SearchOptions {
                postcode: self.postcode.clone(),
                time_window: self.time_window.clone(),
                recipe_words: if self.search.is_empty() {
                    SearchOptions::default().recipe_words
                } else {
                    self.search.clone()
                },
            },
            parallel: ParallelConfig {
                num_workers,
                batch_size: self.batch_size,
                buffer_size: self.queue_size.or(defaults.buffer_size),
            },
        }
    }

    /// Default tracing filter when RUST_LOG is not set
    pub fn log_filter(&self) -> &'static str {
        if self.quiet && self.verbose == 0 {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
