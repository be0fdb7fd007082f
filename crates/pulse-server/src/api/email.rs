use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use pulse_pipeline::{EmailContent, MailError};

use super::{ApiError, ApiResponse, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct SendEmailRequest {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    pulse: Option<Value>,
}

#[derive(Debug, Serialize)]
pub(super) struct SendEmailData {
    message: &'static str,
    id: Option<String>,
}

/// Email a pulse the client already holds, typically one returned by
/// `/api/v1/analyze`.
pub(super) async fn send_email(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SendEmailRequest>,
) -> Response {
    let email = body.email.as_deref().map(str::trim).filter(|e| !e.is_empty());
    let pulse = body.pulse.filter(|p| !p.is_null());
    let (Some(email), Some(pulse)) = (email, pulse) else {
        return ApiError::new(req_id.0, "bad_request", "Email and pulse data are required")
            .into_response();
    };

    let content = EmailContent::from_pulse_value(state.services.pipeline.app_name(), &pulse);
    match state.services.mailer.send_report(email, &content).await {
        Ok(receipt) => {
            tracing::info!(id = ?receipt.id, "pulse email sent");
            Json(ApiResponse::new(
                req_id.0,
                SendEmailData {
                    message: "Email sent successfully",
                    id: receipt.id,
                },
            ))
            .into_response()
        }
        Err(e @ MailError::InvalidRecipient(_)) => {
            ApiError::new(req_id.0, "validation_error", e.to_string()).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "pulse email failed");
            ApiError::new(req_id.0, "internal_error", "Failed to send email")
                .with_details(e.to_string())
                .into_response()
        }
    }
}
