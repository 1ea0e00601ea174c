use std::collections::BTreeSet;

use super::filter::{is_constrained, Selection};
use super::model::{Dataset, Dimension};

/// How many states to chart when the preferred labels are not all present.
pub const FALLBACK_STATE_COUNT: usize = 3;

/// Narrow the chart input to a readable handful of states when the user
/// has not picked any.
///
/// Uses `preferred` if every label is present, otherwise the first
/// [`FALLBACK_STATE_COUNT`] states in sorted order. Any explicit state
/// selection makes this a no-op.
pub fn restrict_defaults(dataset: &Dataset, selection: &Selection, preferred: &[String]) -> Dataset {
    if is_constrained(selection, Dimension::State) {
        return dataset.clone();
    }

    let present: BTreeSet<&str> = dataset.records.iter().map(|r| r.state.as_str()).collect();
    let keep: BTreeSet<&str> = if !preferred.is_empty()
        && preferred.iter().all(|s| present.contains(s.as_str()))
    {
        preferred.iter().map(String::as_str).collect()
    } else {
        present.iter().copied().take(FALLBACK_STATE_COUNT).collect()
    };

    dataset.retain_where(|r| keep.contains(r.state.as_str()))
}
