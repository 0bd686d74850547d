//! Handle `POST /analyze`: lab-results payload in, event stream out.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::app::AppState;
use crate::sse;

/// Goal template for a full analysis run; `{context_file}` is replaced with
/// the invocation's scratch document path.
pub(crate) const ANALYZE_GOAL: &str = "Analyze the lab results from {context_file} and provide \
a comprehensive explanation. If any of the values suggest a specific health issue, diagnose it \
and suggest next steps to bring up with a professional health care provider.";

/// Body must be a non-empty JSON object (the lab-results document itself);
/// anything else is rejected with 400 before planning begins.
pub(crate) async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Response {
    let Some(document) = payload.as_object().filter(|map| !map.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            "payload must be a non-empty JSON object of lab results",
        )
            .into_response();
    };
    tracing::info!(values = document.len(), "analyze request");
    let rx = state.runner.handle(ANALYZE_GOAL, Some(document.clone()));
    sse::stream_response(rx)
}
