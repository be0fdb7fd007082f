//! App Store customer-review feed client.
//!
//! The feed is served as JSON at
//! `/{country}/rss/customerreviews/page={n}/id={app_id}/sortby=mostrecent/json`,
//! newest first, a few dozen entries per page. Apple stops serving after page 10.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;

use pulse_core::{Review, ReviewSource, ReviewWindow};

use crate::adapter::SourceAdapter;
use crate::error::SourceError;
use crate::http::{build_client, get_json, parse_base_url};

#[derive(Debug, Deserialize)]
struct FeedResponse {
    feed: Feed,
}

/// Entries stay untyped until each one is checked on its own; the feed
/// mixes in app-metadata entries that carry no rating.
#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(default)]
    entry: Option<OneOrMany<serde_json::Value>>,
}

/// The feed collapses a single-entry page into a bare object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
struct Label {
    label: String,
}

#[derive(Debug, Deserialize)]
struct Author {
    name: Label,
}

#[derive(Debug, Deserialize)]
struct FeedEntry {
    id: Label,
    author: Option<Author>,
    updated: Label,
    #[serde(rename = "im:rating")]
    rating: Label,
    #[serde(rename = "im:version")]
    version: Option<Label>,
    title: Option<Label>,
    content: Option<Label>,
    #[serde(default)]
    link: Option<serde_json::Value>,
}

/// Paginated client for the App Store review feed.
pub struct StoreClient {
    client: Client,
    base_url: Url,
    app_id: String,
    country: String,
    max_pages: u32,
}

impl StoreClient {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built, or
    /// [`SourceError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(
        base_url: &str,
        app_id: &str,
        country: &str,
        max_pages: u32,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            base_url: parse_base_url(base_url)?,
            app_id: app_id.to_owned(),
            country: country.to_lowercase(),
            max_pages: max_pages.max(1),
        })
    }

    fn page_url(&self, page: u32) -> Result<Url, SourceError> {
        let path = format!(
            "{}/rss/customerreviews/page={page}/id={}/sortby=mostrecent/json",
            self.country, self.app_id
        );
        self.base_url
            .join(&path)
            .map_err(|e| SourceError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Fetch and normalize a single page.
    ///
    /// Returns the normalized reviews and the raw entry count (entries that
    /// fail normalization are skipped but still count as page content).
    ///
    /// # Errors
    ///
    /// Propagates HTTP, status, and decoding failures.
    pub async fn fetch_page(&self, page: u32) -> Result<(Vec<Review>, usize), SourceError> {
        let url = self.page_url(page)?;
        let response: FeedResponse =
            get_json(&self.client, url, &format!("store review page {page}")).await?;

        let entries = response
            .feed
            .entry
            .map(OneOrMany::into_vec)
            .unwrap_or_default();
        let raw_count = entries.len();

        let reviews = entries
            .into_iter()
            .filter_map(|entry| match review_from_entry(entry) {
                Ok(review) => Some(review),
                Err(reason) => {
                    tracing::debug!(page, reason, "skipping store review entry");
                    None
                }
            })
            .collect();

        Ok((reviews, raw_count))
    }
}

#[async_trait]
impl SourceAdapter for StoreClient {
    fn source(&self) -> ReviewSource {
        ReviewSource::Store
    }

    /// Walk pages from 1 until the ceiling, an empty page, or a page whose
    /// oldest review predates `window.start`.
    ///
    /// A failure on the first page is returned; a failure on a later page
    /// keeps what was already collected.
    async fn fetch(&self, window: &ReviewWindow) -> Result<Vec<Review>, SourceError> {
        let mut all_reviews = Vec::new();

        for page in 1..=self.max_pages {
            let (reviews, raw_count) = match self.fetch_page(page).await {
                Ok(result) => result,
                Err(e) if page > 1 => {
                    tracing::warn!(
                        page,
                        error = %e,
                        "store page fetch failed; keeping earlier pages"
                    );
                    break;
                }
                Err(e) => return Err(e),
            };

            if raw_count == 0 {
                break;
            }

            let oldest = reviews.iter().map(|r| r.date).min();
            all_reviews.extend(reviews);

            if oldest.is_some_and(|oldest| oldest < window.start) {
                tracing::debug!(page, "store page reached past the window start");
                break;
            }
        }

        Ok(all_reviews)
    }
}

fn review_from_entry(value: serde_json::Value) -> Result<Review, &'static str> {
    let entry: FeedEntry =
        serde_json::from_value(value).map_err(|_| "entry is not a customer review")?;
    normalize_entry(entry)
}

fn normalize_entry(entry: FeedEntry) -> Result<Review, &'static str> {
    let text = entry
        .content
        .map(|c| c.label.trim().to_owned())
        .unwrap_or_default();
    if text.is_empty() {
        return Err("empty review text");
    }

    let score: u8 = entry
        .rating
        .label
        .trim()
        .parse()
        .map_err(|_| "rating is not a number")?;
    if !(1..=5).contains(&score) {
        return Err("rating outside 1-5");
    }

    let date = DateTime::parse_from_rfc3339(entry.updated.label.trim())
        .map_err(|_| "unparseable updated timestamp")?
        .with_timezone(&Utc);

    Ok(Review {
        id: entry.id.label,
        user_name: entry
            .author
            .map(|a| a.name.label)
            .unwrap_or_default(),
        user_image: None,
        date,
        score,
        title: entry.title.map(|t| t.label).filter(|t| !t.is_empty()),
        text,
        url: entry.link.as_ref().and_then(extract_href),
        version: entry.version.map(|v| v.label).filter(|v| !v.is_empty()),
        source: ReviewSource::Store,
    })
}

/// Pulls `attributes.href` out of a link that may be an object or an array.
fn extract_href(link: &serde_json::Value) -> Option<String> {
    let first = match link {
        serde_json::Value::Array(items) => items.first()?,
        other => other,
    };
    first
        .get("attributes")?
        .get("href")?
        .as_str()
        .map(str::to_owned)
}
