use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use pulse_core::Environment;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::api::ApiError;

/// Request ID extracted from the `x-request-id` header or generated.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Shared secret guarding the scheduled trigger.
///
/// With no secret configured every request is rejected.
#[derive(Debug, Clone, Default)]
pub struct CronAuth {
    secret: Option<Arc<str>>,
}

impl CronAuth {
    #[must_use]
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            secret: secret
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(Arc::from),
        }
    }

    /// Builds the trigger guard from `PULSE_CRON_SECRET`.
    ///
    /// In development a missing secret leaves the trigger locked (every
    /// request gets 401). In other environments it fails startup.
    ///
    /// # Errors
    ///
    /// Returns an error outside development when no secret is configured.
    pub fn from_config(secret: Option<&str>, env: Environment) -> anyhow::Result<Self> {
        let auth = Self::new(secret);
        if auth.secret.is_none() {
            if env == Environment::Development {
                tracing::warn!(
                    "PULSE_CRON_SECRET not set; the weekly trigger rejects every request"
                );
            } else {
                anyhow::bail!("PULSE_CRON_SECRET is required outside development ({env})");
            }
        }
        Ok(auth)
    }

    fn allows(&self, token: &str) -> bool {
        self.secret
            .as_deref()
            .is_some_and(|secret| secret_matches(secret, token))
    }
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware rejecting trigger requests whose bearer token does not match
/// the configured cron secret. Rejected requests never reach the handler.
pub async fn require_cron_secret(
    State(auth): State<CronAuth>,
    req: Request,
    next: Next,
) -> Response {
    let token = extract_bearer_token(req.headers().get(AUTHORIZATION));

    match token {
        Some(token) if auth.allows(token) => next.run(req).await,
        _ => {
            tracing::warn!(path = %req.uri().path(), "rejected unauthorized trigger request");
            let request_id = req
                .extensions()
                .get::<RequestId>()
                .map(|r| r.0.clone())
                .unwrap_or_default();
            ApiError::new(
                request_id,
                "unauthorized",
                "missing or invalid bearer token",
            )
            .into_response()
        }
    }
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|s| !s.trim().is_empty())
}

fn secret_matches(expected: &str, provided: &str) -> bool {
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}
