//! Marketplace review-listing client.
//!
//! The listing service has no date-bounded query, so one oversized request
//! (`num=N`, newest first) is issued and the aggregator does the windowing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;

use pulse_core::{Review, ReviewSource, ReviewWindow};

use crate::adapter::SourceAdapter;
use crate::error::SourceError;
use crate::http::{build_client, get_json, parse_base_url};

/// Records are decoded one by one so a single malformed record is skipped
/// instead of failing the whole listing.
#[derive(Debug, Deserialize)]
struct ListingResponse {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListingId {
    Text(String),
    Number(i64),
}

/// Dates arrive as RFC 3339 strings or epoch milliseconds.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListingDate {
    Text(String),
    EpochMillis(i64),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingReview {
    id: ListingId,
    #[serde(default)]
    user_name: Option<String>,
    #[serde(default)]
    user_image: Option<String>,
    date: ListingDate,
    score: i64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

pub struct MarketplaceClient {
    client: Client,
    base_url: Url,
    app_id: String,
    lang: String,
    country: String,
    fetch_size: u32,
}

impl MarketplaceClient {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built, or
    /// [`SourceError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(
        base_url: &str,
        app_id: &str,
        lang: &str,
        country: &str,
        fetch_size: u32,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            base_url: parse_base_url(base_url)?,
            app_id: app_id.to_owned(),
            lang: lang.to_owned(),
            country: country.to_owned(),
            fetch_size,
        })
    }

    fn listing_url(&self) -> Result<Url, SourceError> {
        let mut url = self
            .base_url
            .join(&format!("apps/{}/reviews", self.app_id))
            .map_err(|e| SourceError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("lang", &self.lang)
            .append_pair("country", &self.country)
            .append_pair("sort", "newest")
            .append_pair("num", &self.fetch_size.to_string());
        Ok(url)
    }
}

#[async_trait]
impl SourceAdapter for MarketplaceClient {
    fn source(&self) -> ReviewSource {
        ReviewSource::Marketplace
    }

    async fn fetch(&self, _window: &ReviewWindow) -> Result<Vec<Review>, SourceError> {
        let url = self.listing_url()?;
        let response: ListingResponse =
            get_json(&self.client, url, "marketplace review listing").await?;

        Ok(reviews_from_listing(response.data))
    }
}

fn reviews_from_listing(data: Vec<serde_json::Value>) -> Vec<Review> {
    data.into_iter()
        .filter_map(|value| match review_from_value(value) {
            Ok(review) => Some(review),
            Err(reason) => {
                tracing::debug!(reason, "skipping marketplace review");
                None
            }
        })
        .collect()
}

fn review_from_value(value: serde_json::Value) -> Result<Review, &'static str> {
    let raw: ListingReview =
        serde_json::from_value(value).map_err(|_| "malformed listing record")?;
    normalize_listing(raw)
}

fn normalize_listing(raw: ListingReview) -> Result<Review, &'static str> {
    let text = raw.text.map(|t| t.trim().to_owned()).unwrap_or_default();
    if text.is_empty() {
        return Err("empty review text");
    }

    let score = u8::try_from(raw.score).map_err(|_| "score out of range")?;
    if !(1..=5).contains(&score) {
        return Err("score outside 1-5");
    }

    let date = match raw.date {
        ListingDate::Text(s) => DateTime::parse_from_rfc3339(s.trim())
            .map_err(|_| "unparseable date")?
            .with_timezone(&Utc),
        ListingDate::EpochMillis(ms) => {
            DateTime::<Utc>::from_timestamp_millis(ms).ok_or("epoch date out of range")?
        }
    };

    let id = match raw.id {
        ListingId::Text(s) => s,
        ListingId::Number(n) => n.to_string(),
    };

    Ok(Review {
        id,
        user_name: raw.user_name.unwrap_or_default(),
        user_image: raw.user_image,
        date,
        score,
        title: raw.title.filter(|t| !t.is_empty()),
        text,
        url: raw.url,
        version: raw.version,
        source: ReviewSource::Marketplace,
    })
}
