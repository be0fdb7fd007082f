use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Which upstream listing a review was collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSource {
    Marketplace,
    Store,
}

impl ReviewSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewSource::Marketplace => "marketplace",
            ReviewSource::Store => "store",
        }
    }
}

impl std::fmt::Display for ReviewSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A review normalized from either source.
///
/// `id` is only unique within `source`. `date` is always a UTC instant no
/// matter what the upstream field was called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_image: Option<String>,
    pub date: DateTime<Utc>,
    pub score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub source: ReviewSource,
}

/// Closed time interval `[start, end]` used to decide which reviews are current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReviewWindow {
    /// Window covering the `days` days that end at `now`.
    #[must_use]
    pub fn trailing_days(now: DateTime<Utc>, days: u32) -> Self {
        Self {
            start: now - Duration::days(i64::from(days)),
            end: now,
        }
    }

    /// Both boundaries are inclusive.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}
