use std::cmp::Ordering;
use std::collections::HashSet;

use super::Suggestion;

/// Order by priority (high first) then confidence (highest first), keep the first
/// occurrence of each rule id and truncate to `limit`.
///
/// The sort is stable, so ties keep rule emission order.
pub(crate) fn rank(mut suggestions: Vec<Suggestion>, limit: usize) -> Vec<Suggestion> {
    let mut seen = HashSet::new();
    suggestions.retain(|suggestion| seen.insert(suggestion.id));

    suggestions.sort_by(compare);
    suggestions.truncate(limit);
    suggestions
}

fn compare(left: &Suggestion, right: &Suggestion) -> Ordering {
    left.priority
        .rank()
        .cmp(&right.priority.rank())
        .then_with(|| right.confidence.total_cmp(&left.confidence))
}
