//! Fakes shared by the pipeline integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use pulse_core::{Review, ReviewSource, ReviewWindow, Taxonomy};
use pulse_llm::{LlmClient, LlmError};
use pulse_pipeline::{DeliveryReceipt, EmailContent, MailError, Mailer, PipelineSettings};
use pulse_sources::{SourceAdapter, SourceError};

pub const PULSE_REPLY: &str = r#"{
    "title": "Payouts lag behind",
    "overview": "Withdrawals and KYC drive most complaints.",
    "top_themes": ["Withdrawals", "KYC"],
    "user_quotes": ["My money is stuck"],
    "action_ideas": ["Publish payout SLAs"]
}"#;

pub struct FakeSource {
    pub source: ReviewSource,
    pub reviews: Vec<Review>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeSource {
    pub fn with(source: ReviewSource, reviews: Vec<Review>) -> Arc<Self> {
        Arc::new(Self {
            source,
            reviews,
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(source: ReviewSource) -> Arc<Self> {
        Arc::new(Self {
            source,
            reviews: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceAdapter for FakeSource {
    fn source(&self) -> ReviewSource {
        self.source
    }

    async fn fetch(&self, _window: &ReviewWindow) -> Result<Vec<Review>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SourceError::UnexpectedStatus {
                status: 500,
                url: "http://fake".to_owned(),
            });
        }
        Ok(self.reviews.clone())
    }
}

/// Hands out scripted replies in order; fails once they run out.
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: AtomicUsize,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn ok(replies: &[&str]) -> Arc<Self> {
        Self::new(replies.iter().map(|r| Ok((*r).to_owned())).collect())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyResponse))
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(String, EmailContent)>>,
    pub fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<(String, EmailContent)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_report(
        &self,
        to: &str,
        content: &EmailContent,
    ) -> Result<DeliveryReceipt, MailError> {
        if self.fail {
            return Err(MailError::Provider {
                status: 422,
                message: "invalid from address".to_owned(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_owned(), content.clone()));
        Ok(DeliveryReceipt {
            id: Some("msg-1".to_owned()),
        })
    }
}

pub fn review(id: &str, days_ago: i64, source: ReviewSource, text: &str) -> Review {
    Review {
        id: id.to_owned(),
        user_name: "user".to_owned(),
        user_image: None,
        date: Utc::now() - Duration::days(days_ago),
        score: 2,
        title: None,
        text: text.to_owned(),
        url: None,
        version: None,
        source,
    }
}

pub fn settings() -> PipelineSettings {
    PipelineSettings {
        app_name: "IND Money".to_owned(),
        taxonomy: Taxonomy::new(
            ["Onboarding", "KYC", "Payments", "Statements", "Withdrawals"]
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
            true,
        ),
        window_days: 84,
        review_limit: 250,
        batch_size: 20,
    }
}
