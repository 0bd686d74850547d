//! Axum app: state, configuration from env, and the router.

use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use maestro::PlanRunner;
use tower_http::cors::CorsLayer;

/// Server configuration beyond the engine wiring.
#[derive(Clone)]
pub struct ServeConfig {
    /// Max events buffered between an invocation task and its SSE response.
    pub event_queue_capacity: usize,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            event_queue_capacity: maestro::EVENT_QUEUE_CAPACITY,
        }
    }
}

/// Builds [`ServeConfig`] from environment variables, falling back to
/// [`Default`] for unset or invalid values.
///
/// - `SERVE_EVENT_QUEUE_CAPACITY` (default 128)
pub fn serve_config_from_env() -> ServeConfig {
    let default = ServeConfig::default();
    ServeConfig {
        event_queue_capacity: std::env::var("SERVE_EVENT_QUEUE_CAPACITY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(default.event_queue_capacity),
    }
}

/// Shared state for the HTTP server: the engine and the patient-data document.
/// Built once at startup and cloned per request via `Arc`.
pub struct AppState {
    pub runner: PlanRunner,
    pub patient_data: PathBuf,
}

/// Builds the router: the two streaming routes, the patient-data document,
/// and a permissive CORS layer for the browser UI.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/analyze", post(super::analyze::analyze))
        .route("/chat", post(super::chat::chat))
        .route("/patient-data", get(super::patient::patient_data))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
