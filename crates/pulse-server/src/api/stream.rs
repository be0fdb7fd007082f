use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;

use super::AppState;

/// `GET /api/v1/analyze/stream`: run the pipeline and forward each progress
/// event as an SSE `data:` frame. The stream closes after the terminal event.
pub(super) async fn analyze_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::info!("progress stream client connected");
    let mut rx = Arc::clone(&state.services.pipeline).stream();

    let stream = async_stream::stream! {
        while let Some(event) = rx.recv().await {
            match Event::default().json_data(&event) {
                Ok(frame) => yield Ok(frame),
                Err(e) => {
                    tracing::warn!(step = ?event.step, error = %e, "failed to encode progress event");
                }
            }
        }
        tracing::debug!("progress stream finished");
    };

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
