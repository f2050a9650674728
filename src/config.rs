use crate::error::{PipelineError, Result};
use crate::parallel::ParallelConfig;

pub const DEFAULT_POSTCODE: &str = "10120";
pub const DEFAULT_TIME_WINDOW: &str = "9AM - 4PM";
pub const DEFAULT_SEARCH_WORDS: [&str; 3] = ["Potato", "Veggie", "Mushroom"];

/// Main configuration for a single statistics run
#[derive(Debug, Clone, Default)]
pub struct StatsConfig {
    pub search: SearchOptions,
    pub parallel: ParallelConfig,
}

/// Raw search options, compiled into a [`crate::search::SearchConfig`]
/// once per run.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub postcode: String,
    pub time_window: String,
    pub recipe_words: Vec<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            postcode: DEFAULT_POSTCODE.to_string(),
            time_window: DEFAULT_TIME_WINDOW.to_string(),
            recipe_words: DEFAULT_SEARCH_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl SearchOptions {
    /// Search words with blanks removed; falls back to the defaults when
    /// nothing usable was supplied.
    pub fn effective_words(&self) -> Vec<String> {
        let words: Vec<String> = self
            .recipe_words
            .iter()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        if words.is_empty() {
            DEFAULT_SEARCH_WORDS.iter().map(|w| w.to_string()).collect()
        } else {
            words
        }
    }
}

impl StatsConfig {
    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.parallel.num_workers = num_workers;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.parallel.batch_size = batch_size;
        self
    }

    pub fn with_postcode(mut self, postcode: impl Into<String>) -> Self {
        self.search.postcode = postcode.into();
        self
    }

    pub fn with_time_window(mut self, time_window: impl Into<String>) -> Self {
        self.search.time_window = time_window.into();
        self
    }

    pub fn with_recipe_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search.recipe_words = words.into_iter().map(Into::into).collect();
        self
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.parallel.num_workers == 0 {
            return Err(PipelineError::Config(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.parallel.batch_size == 0 {
            return Err(PipelineError::Config(
                "batch size must be at least 1".to_string(),
            ));
        }
        if self.parallel.buffer_size == Some(0) {
            return Err(PipelineError::Config(
                "batch queue capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
