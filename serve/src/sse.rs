//! Event channel to server-sent-events bridge.

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use stream_event::AgentEvent;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;

/// Wraps an invocation's event receiver in a `text/event-stream` response.
/// Each event is serialized as one `data: <json>` frame; the stream ends when
/// the invocation task drops its sender.
pub(crate) fn stream_response(rx: tokio::sync::mpsc::Receiver<AgentEvent>) -> Response {
    let stream = ReceiverStream::new(rx).map(|event| SseEvent::default().json_data(&event));
    Sse::new(stream).keep_alive(KeepAlive::default()).into_response()
}
