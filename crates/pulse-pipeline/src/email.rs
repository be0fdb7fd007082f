//! Report delivery by email through an HTTP mail provider.

use std::fmt::Write as _;
use std::time::Duration;

use async_trait::async_trait;
use pulse_core::PulseReport;
use pulse_llm::render::escape_html;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MailError;

const FALLBACK_TITLE: &str = "Weekly Pulse Report";

/// Subject and HTML body of a report email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
}

impl EmailContent {
    #[must_use]
    pub fn subject_for(app_name: &str) -> String {
        format!("Weekly Pulse: {app_name}")
    }

    #[must_use]
    pub fn from_report(app_name: &str, report: &PulseReport) -> Self {
        Self {
            subject: Self::subject_for(app_name),
            html: report.html_report.clone(),
        }
    }

    /// Build the email from a pulse supplied by a client as loose JSON.
    ///
    /// Uses `html_report` when present. Otherwise a plain body is rendered
    /// from `title`, `overview`, and the three lists, each of which may be a
    /// string or an array.
    #[must_use]
    pub fn from_pulse_value(app_name: &str, pulse: &Value) -> Self {
        let html = match pulse.get("html_report").and_then(Value::as_str) {
            Some(html) if !html.trim().is_empty() => html.to_owned(),
            _ => fallback_html(pulse),
        };
        Self {
            subject: Self::subject_for(app_name),
            html,
        }
    }
}

fn fallback_html(pulse: &Value) -> String {
    let text = |key: &str| pulse.get(key).and_then(Value::as_str).unwrap_or_default();
    let title = match text("title") {
        "" => FALLBACK_TITLE,
        title => title,
    };

    let mut html = String::new();
    let _ = writeln!(html, "<h1>{}</h1>", escape_html(title));
    let _ = writeln!(html, "<p>{}</p>", escape_html(text("overview")));

    for (heading, key, quoted) in [
        ("Top Themes", "top_themes", false),
        ("User Quotes", "user_quotes", true),
        ("Action Ideas", "action_ideas", false),
    ] {
        let _ = writeln!(html, "<h2>{heading}</h2>\n<ul>");
        for item in list_items(pulse.get(key)) {
            let item = escape_html(&item);
            if quoted {
                let _ = writeln!(html, "<li>&quot;{item}&quot;</li>");
            } else {
                let _ = writeln!(html, "<li>{item}</li>");
            }
        }
        html.push_str("</ul>\n");
    }
    html
}

/// A list value that may arrive as an array, a single string, or not at all.
fn list_items(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![other.to_string()],
    }
}

/// Provider acknowledgement of an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    #[serde(default)]
    pub id: Option<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver `content` to a single recipient.
    async fn send_report(
        &self,
        to: &str,
        content: &EmailContent,
    ) -> Result<DeliveryReceipt, MailError>;
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    message: Option<String>,
}

/// Mailer for the Resend HTTP API (`POST /emails`).
///
/// The API key is only checked at send time so the rest of the service can
/// run without mail configured.
pub struct ResendMailer {
    client: Client,
    api_key: Option<String>,
    from: String,
    endpoint: Url,
}

impl ResendMailer {
    /// # Errors
    ///
    /// Returns [`MailError::Http`] if the client cannot be constructed, or
    /// [`MailError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(
        api_key: Option<String>,
        from: &str,
        base_url: &str,
        timeout_secs: u64,
    ) -> Result<Self, MailError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let invalid = |reason: String| MailError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        };
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join("emails"))
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            from: from.to_owned(),
            endpoint,
        })
    }
}

fn validate_recipient(to: &str) -> Result<&str, MailError> {
    let to = to.trim();
    match to.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') && !to.contains(' ') => {
            Ok(to)
        }
        _ => Err(MailError::InvalidRecipient(to.to_owned())),
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send_report(
        &self,
        to: &str,
        content: &EmailContent,
    ) -> Result<DeliveryReceipt, MailError> {
        let api_key = self.api_key.as_deref().ok_or(MailError::NotConfigured)?;
        let to = validate_recipient(to)?;

        let request = SendRequest {
            from: &self.from,
            to: [to],
            subject: &content.subject,
            html: &content.html,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ProviderError>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or(body);
            return Err(MailError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let receipt: DeliveryReceipt =
            serde_json::from_str(&body).unwrap_or(DeliveryReceipt { id: None });
        tracing::info!(id = ?receipt.id, "report email accepted by provider");
        Ok(receipt)
    }
}
