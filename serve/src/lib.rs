//! HTTP server for maestro (axum + server-sent events).
//!
//! Routes: `POST /analyze` and `POST /chat` stream a run as
//! `text/event-stream`; `GET /patient-data` serves the configured lab-results
//! document. Malformed requests are rejected before planning begins, so no
//! scratch file is ever created for them.
//!
//! **Public API**: [`run_serve`], [`run_serve_on_listener`], [`AppState`],
//! [`serve_config_from_env`].

mod analyze;
mod app;
mod chat;
mod patient;
mod sse;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

pub use app::{router, serve_config_from_env, AppState, ServeConfig};

/// Runs the server on an existing listener. Used by tests (bind to
/// `127.0.0.1:0`, then pass the listener).
pub async fn run_serve_on_listener(
    listener: TcpListener,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = listener.local_addr()?;
    info!("maestro listening on http://{}", addr);
    let app = router(state);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Binds `addr` and serves until the process exits.
pub async fn run_serve(
    addr: std::net::SocketAddr,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;
    run_serve_on_listener(listener, state).await
}
