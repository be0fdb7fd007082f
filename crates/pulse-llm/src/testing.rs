//! Scripted `LlmClient` and review builders shared by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use pulse_core::{Review, ReviewSource, Taxonomy};

use crate::client::LlmClient;
use crate::error::LlmError;

/// Replies are handed out in order; once exhausted every call fails.
pub(crate) struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub(crate) fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn ok(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok((*r).to_owned())).collect())
    }

    pub(crate) fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

pub(crate) fn unavailable() -> LlmError {
    LlmError::Status {
        status: 503,
        body: "overloaded".to_owned(),
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }
}

pub(crate) fn review(id: &str, text: &str) -> Review {
    Review {
        id: id.to_owned(),
        user_name: "user".to_owned(),
        user_image: None,
        date: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap() - Duration::hours(1),
        score: 3,
        title: None,
        text: text.to_owned(),
        url: None,
        version: None,
        source: ReviewSource::Marketplace,
    }
}

pub(crate) fn reviews(n: usize) -> Vec<Review> {
    (1..=n)
        .map(|i| review(&format!("r{i}"), &format!("review text {i}")))
        .collect()
}

pub(crate) fn taxonomy() -> Taxonomy {
    Taxonomy::new(
        ["Onboarding", "KYC", "Payments", "Statements", "Withdrawals"]
            .iter()
            .map(|s| (*s).to_owned())
            .collect(),
        true,
    )
}
