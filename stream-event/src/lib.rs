//! Streamed agent event protocol: the wire shape of one progress/result/error event.
//!
//! This crate defines [`AgentEvent`] and nothing else. It does not depend on maestro;
//! maestro produces events and the transport serializes them (`data: <json>\n\n` over
//! an event-stream response).

pub mod event;

pub use event::AgentEvent;
