//! Handle `GET /patient-data`: serve the configured lab-results document.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::app::AppState;

pub(crate) async fn patient_data(State(state): State<Arc<AppState>>) -> Response {
    let content = match tokio::fs::read_to_string(&state.patient_data).await {
        Ok(content) => content,
        Err(e) => {
            tracing::error!(path = %state.patient_data.display(), "patient data read: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "failed to read patient data")
                .into_response();
        }
    };
    match serde_json::from_str::<Value>(&content) {
        Ok(value) => Json(value).into_response(),
        Err(e) => {
            tracing::error!(path = %state.patient_data.display(), "patient data parse: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "patient data is not valid JSON").into_response()
        }
    }
}
