use pulse_core::{Review, ReviewWindow};

/// Cap applied after sorting when the caller does not override it.
pub const DEFAULT_REVIEW_LIMIT: usize = 250;

/// Merge per-source review lists into one windowed, newest-first list.
///
/// Lists are concatenated in adapter order, reviews outside `window` are
/// dropped, the rest are stably sorted by `date` descending, and the result
/// is truncated to `limit`. Reviews with equal dates keep adapter order.
/// The same review text posted on both sources is not de-duplicated.
#[must_use]
pub fn aggregate(per_source: Vec<Vec<Review>>, window: &ReviewWindow, limit: usize) -> Vec<Review> {
    let mut merged: Vec<Review> = per_source
        .into_iter()
        .flatten()
        .filter(|review| window.contains(review.date))
        .collect();

    merged.sort_by(|a, b| b.date.cmp(&a.date));
    merged.truncate(limit);
    merged
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
