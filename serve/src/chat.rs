//! Handle `POST /chat`: free-form question, optionally grounded in lab results.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use maestro::{Context, CONTEXT_FILE_PLACEHOLDER};
use serde::Deserialize;

use crate::app::AppState;
use crate::sse;

#[derive(Deserialize)]
pub(crate) struct ChatRequest {
    pub message: Option<String>,
    pub context: Option<Context>,
}

/// `message` is required; `context`, when present, is materialized for the
/// run and the goal points the planner at it.
pub(crate) async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Response {
    let Some(message) = request.message.filter(|m| !m.trim().is_empty()) else {
        return (StatusCode::BAD_REQUEST, "message is required").into_response();
    };
    let context = request.context.filter(|c| !c.is_empty());
    let goal = match &context {
        Some(_) => format!(
            "{}\n\nThe patient's lab results are in the JSON file at {}.",
            message, CONTEXT_FILE_PLACEHOLDER
        ),
        None => message,
    };
    tracing::info!(with_context = context.is_some(), "chat request");
    let rx = state.runner.handle(goal, context);
    sse::stream_response(rx)
}
