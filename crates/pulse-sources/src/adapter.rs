use std::sync::Arc;

use async_trait::async_trait;
use pulse_core::{Review, ReviewSource, ReviewWindow};

use crate::error::SourceError;

/// A client for one upstream review listing.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Which listing this adapter reads.
    fn source(&self) -> ReviewSource;

    /// Fetch recent reviews, newest first where the upstream allows it.
    ///
    /// `window` is a hint for how far back to page; callers still filter.
    async fn fetch(&self, window: &ReviewWindow) -> Result<Vec<Review>, SourceError>;
}

/// Run one adapter, turning any failure into an empty list.
///
/// "Fetched nothing" and "fetch failed" look the same to the caller; the
/// difference only shows up in the logs.
pub async fn fetch_or_empty(adapter: &dyn SourceAdapter, window: &ReviewWindow) -> Vec<Review> {
    let source = adapter.source();
    match adapter.fetch(window).await {
        Ok(reviews) => {
            tracing::debug!(%source, count = reviews.len(), "collected reviews");
            reviews
        }
        Err(e) => {
            tracing::warn!(%source, error = %e, "review fetch failed");
            Vec::new()
        }
    }
}

/// Collect reviews from every adapter, one after the other, in registration order.
///
/// Returns one list per adapter. Never fails.
pub async fn collect_reviews(
    adapters: &[Arc<dyn SourceAdapter>],
    window: &ReviewWindow,
) -> Vec<Vec<Review>> {
    let mut per_source = Vec::with_capacity(adapters.len());
    for adapter in adapters {
        per_source.push(fetch_or_empty(adapter.as_ref(), window).await);
    }
    per_source
}
