use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;

use pulse_core::PulseReport;
use pulse_pipeline::{run_weekly_pulse, WeeklyOutcome};

use super::{ApiError, ApiResponse, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WeeklyPulseData {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pulse: Option<PulseReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email_id: Option<String>,
}

/// Scheduled trigger: generate the pulse and email it to the configured
/// recipient. Reached only after the cron secret check passes.
pub(super) async fn weekly_pulse(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Response {
    let services = &state.services;
    let outcome = run_weekly_pulse(
        &services.pipeline,
        services.mailer.as_ref(),
        state.report_recipient.as_deref(),
    )
    .await;

    match outcome {
        Ok(WeeklyOutcome::NoReviews) => Json(ApiResponse::new(
            req_id.0,
            WeeklyPulseData {
                message: "No reviews found",
                pulse: None,
                email_id: None,
            },
        ))
        .into_response(),
        Ok(WeeklyOutcome::Sent { report, receipt }) => Json(ApiResponse::new(
            req_id.0,
            WeeklyPulseData {
                message: "Weekly pulse generated and sent",
                pulse: Some(*report),
                email_id: receipt.id,
            },
        ))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "weekly pulse trigger failed");
            ApiError::new(req_id.0, "internal_error", "Weekly pulse cron failed")
                .with_details(e.to_string())
                .into_response()
        }
    }
}
