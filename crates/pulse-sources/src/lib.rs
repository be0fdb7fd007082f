//! Review source adapters and the aggregator that merges their output.
//!
//! Two upstreams are supported: the App Store customer-review feed (paged,
//! newest first) and a marketplace review-listing service (one bulk request).
//! Both normalize into [`pulse_core::Review`]. [`collect_reviews`] never
//! fails; an adapter error is logged and counts as an empty result.

pub mod adapter;
pub mod aggregate;
pub mod error;
pub mod marketplace;
pub mod store;

mod http;

pub use adapter::{collect_reviews, fetch_or_empty, SourceAdapter};
pub use aggregate::{aggregate, DEFAULT_REVIEW_LIMIT};
pub use error::SourceError;
pub use marketplace::MarketplaceClient;
pub use store::StoreClient;
