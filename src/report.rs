//! Final report derived from a merged [`AggregateState`].

use serde::{Deserialize, Serialize};

use crate::search::SearchConfig;
use crate::stats::AggregateState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeCount {
    pub recipe: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusiestPostcode {
    pub postcode: String,
    pub delivery_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostcodeDeliveryTime {
    pub postcode: String,
    pub from: String,
    pub to: String,
    pub delivery_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub unique_recipe_count: usize,
    pub count_per_recipe: Vec<RecipeCount>,
    pub busiest_postcode: BusiestPostcode,
    pub count_per_postcode_and_time: PostcodeDeliveryTime,
    pub match_by_name: Vec<String>,
}

/// Build the deterministic report for a merged state. Never fails: an empty
/// state yields an empty postcode with a zero count as the busiest postcode.
pub fn build_report(merged: &AggregateState, search: &SearchConfig) -> Report {
    let mut count_per_recipe: Vec<RecipeCount> = merged
        .recipe_counts
        .iter()
        .map(|(recipe, count)| RecipeCount {
            recipe: recipe.clone(),
            count: *count,
        })
        .collect();
    count_per_recipe.sort_by(|a, b| a.recipe.cmp(&b.recipe));

    let mut match_by_name: Vec<String> = merged
        .name_match_counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(name, _)| name.clone())
        .collect();
    match_by_name.sort();

    Report {
        unique_recipe_count: merged.recipe_counts.len(),
        count_per_recipe,
        busiest_postcode: busiest_postcode(merged),
        count_per_postcode_and_time: PostcodeDeliveryTime {
            postcode: search.target_postcode.clone(),
            from: search.target_window.start.to_string(),
            to: search.target_window.end.to_string(),
            delivery_count: merged.window_match_count,
        },
        match_by_name,
    }
}

/// Highest delivery count wins; ties go to the lexicographically smallest
/// postcode.
fn busiest_postcode(merged: &AggregateState) -> BusiestPostcode {
    if merged.recipe_counts.is_empty() {
        return BusiestPostcode::default();
    }
    merged
        .postcode_counts
        .iter()
        .max_by(|(pa, ca), (pb, cb)| ca.cmp(cb).then_with(|| pb.cmp(pa)))
        .map(|(postcode, count)| BusiestPostcode {
            postcode: postcode.clone(),
            delivery_count: *count,
        })
        .unwrap_or_default()
}
