//! Parallel processing module for recipe-stats
//!
//! This module splits the aggregation work across multiple threads. State is
//! never shared between workers: each one accumulates privately and the
//! combiner merges the results once every worker is done.
//!
//! # Module Structure
//!
//! - `types`: Configuration and the messages passed between threads
//! - `batching`: Decoder thread feeding the batch queue
//! - `worker`: Worker thread accumulating batches
//! - `combiner`: Fan-in thread merging worker states
//! - `processor`: Main ParallelProcessor orchestration

mod batching;
mod combiner;
mod processor;
mod types;
mod worker;

// Re-export public types
pub use processor::ParallelProcessor;
pub use types::{ParallelConfig, PipelineRun};
