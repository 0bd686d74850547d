//! Event types delivered to a streaming caller.
//!
//! Ordering contract (enforced by the producer, not here): all `Thought` events
//! precede any `Response`/`Error` event, and `Error` is always terminal.

use serde::{Deserialize, Serialize};

/// One unit of streamed output.
///
/// Wire shape is `{"type": "thought"|"response"|"error", "content": "..."}`.
/// `Thought` carries a planned step description, `Response` one line of the
/// final answer, `Error` a terminal failure message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    Thought { content: String },
    Response { content: String },
    Error { content: String },
}

impl AgentEvent {
    pub fn thought(content: impl Into<String>) -> Self {
        Self::Thought {
            content: content.into(),
        }
    }

    pub fn response(content: impl Into<String>) -> Self {
        Self::Response {
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::Error {
            content: content.into(),
        }
    }

    /// The event's content, independent of variant.
    pub fn content(&self) -> &str {
        match self {
            Self::Thought { content } | Self::Response { content } | Self::Error { content } => {
                content
            }
        }
    }

    /// True for the terminal `Error` variant.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}
