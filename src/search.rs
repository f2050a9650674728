//! Compiled matching rules shared read-only by every worker.

use regex::{Regex, RegexBuilder};

use crate::config::SearchOptions;
use crate::error::{PipelineError, Result};
use crate::record::Record;
use crate::window::DeliveryWindow;

/// Case-insensitive "contains any of" test over the configured recipe words.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    regex: Regex,
}

impl NameMatcher {
    pub fn new<S: AsRef<str>>(words: &[S]) -> Result<Self> {
        if words.is_empty() {
            return Err(PipelineError::Config(
                "at least one recipe search word is required".to_string(),
            ));
        }
        let pattern = words
            .iter()
            .map(|w| regex::escape(w.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| PipelineError::Config(format!("invalid recipe search words: {e}")))?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, recipe_name: &str) -> bool {
        self.regex.is_match(recipe_name)
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub target_postcode: String,
    pub target_window: DeliveryWindow,
    pub name_matcher: NameMatcher,
}

impl SearchConfig {
    pub fn from_options(options: &SearchOptions) -> Result<Self> {
        let target_window = DeliveryWindow::parse(&options.time_window)?;
        let name_matcher = NameMatcher::new(&options.effective_words())?;
        Ok(Self {
            target_postcode: options.postcode.trim().to_string(),
            target_window,
            name_matcher,
        })
    }

    /// Whether the record was delivered to the target postcode entirely
    /// inside the target window. The record's window is always parsed so
    /// malformed strings surface regardless of postcode.
    pub fn window_matches(&self, record: &Record) -> Result<bool> {
        let window = DeliveryWindow::parse(&record.delivery_window)?;
        Ok(record.postcode == self.target_postcode && self.target_window.contains(&window))
    }

    pub fn name_matches(&self, record: &Record) -> bool {
        self.name_matcher.is_match(&record.recipe_name)
    }
}
