use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;

use pulse_core::PulseReport;
use pulse_pipeline::PipelineOutcome;

use super::{ApiError, ApiResponse, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AnalyzeData {
    message: &'static str,
    pulse: PulseReport,
    reviews_count: usize,
    grouped_reviews_count: usize,
}

/// Run the whole pipeline and answer once the pulse is ready.
pub(super) async fn analyze(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Response {
    match state.services.pipeline.run_blocking().await {
        Ok(PipelineOutcome::Completed(run)) => Json(ApiResponse::new(
            req_id.0,
            AnalyzeData {
                message: "Analysis complete",
                reviews_count: run.reviews_count,
                grouped_reviews_count: run.assignments_count,
                pulse: run.report,
            },
        ))
        .into_response(),
        Ok(PipelineOutcome::NoReviews) => {
            ApiError::new(req_id.0, "not_found", "No reviews found").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "analysis failed");
            ApiError::new(req_id.0, "internal_error", "Analysis failed")
                .with_details(e.to_string())
                .into_response()
        }
    }
}
