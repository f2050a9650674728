use std::collections::HashMap;

use crate::error::Result;
use crate::record::Record;
use crate::search::SearchConfig;

/// Counters accumulated while processing records.
///
/// Every worker owns one instance exclusively; instances are only combined
/// with [`AggregateState::merge`] once a worker has finished. Merging sums
/// every counter, so the combined result does not depend on how records were
/// split across workers or on the order partial states arrive in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateState {
    pub recipe_counts: HashMap<String, usize>,
    pub postcode_counts: HashMap<String, usize>,
    pub name_match_counts: HashMap<String, usize>,
    pub window_match_count: usize,
    pub rows_processed: usize,
}

impl AggregateState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for a single record. The delivery window is evaluated before
    /// any counter moves, so a malformed record leaves the state untouched.
    pub fn observe(&mut self, record: &Record, search: &SearchConfig) -> Result<()> {
        let window_matched = search.window_matches(record)?;
        let name_matched = search.name_matches(record);

        *self
            .recipe_counts
            .entry(record.recipe_name.clone())
            .or_insert(0) += 1;
        *self
            .postcode_counts
            .entry(record.postcode.clone())
            .or_insert(0) += 1;
        if window_matched {
            self.window_match_count += 1;
        }
        if name_matched {
            *self
                .name_match_counts
                .entry(record.recipe_name.clone())
                .or_insert(0) += 1;
        }
        self.rows_processed += 1;
        Ok(())
    }

    pub fn observe_all<'a, I>(&mut self, records: I, search: &SearchConfig) -> Result<()>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        for record in records {
            self.observe(record, search)?;
        }
        Ok(())
    }

    pub fn merge(&mut self, other: AggregateState) {
        merge_counts(&mut self.recipe_counts, other.recipe_counts);
        merge_counts(&mut self.postcode_counts, other.postcode_counts);
        merge_counts(&mut self.name_match_counts, other.name_match_counts);
        self.window_match_count += other.window_match_count;
        self.rows_processed += other.rows_processed;
    }

    /// Sum of all per-recipe counts; equals `rows_processed` for any state
    /// built through `observe` and `merge`.
    pub fn total_recipe_count(&self) -> usize {
        self.recipe_counts.values().sum()
    }

    pub fn format_stats(&self) -> String {
        format!(
            "Rows processed: {}; {} unique recipes, {} postcodes, {} window matches, {} name matches",
            self.rows_processed,
            self.recipe_counts.len(),
            self.postcode_counts.len(),
            self.window_match_count,
            self.name_match_counts.len()
        )
    }
}

fn merge_counts(into: &mut HashMap<String, usize>, from: HashMap<String, usize>) {
    if into.is_empty() {
        *into = from;
        return;
    }
    for (key, count) in from {
        *into.entry(key).or_insert(0) += count;
    }
}
