//! Mock LLM for tests and examples: scripted replies, optional failure mode.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::LlmError;
use crate::llm::LlmClient;

/// Mock LLM returning scripted replies in order, repeating the last one when
/// the script runs out. `failing` builds a mock whose every call errors, for
/// exercising backend-failure paths.
pub struct MockLlm {
    replies: Vec<String>,
    next: AtomicUsize,
    error: Option<String>,
}

impl MockLlm {
    /// Always returns `reply`.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self::with_replies(vec![reply.into()])
    }

    /// Returns `replies` in order; the last one repeats once exhausted.
    pub fn with_replies(replies: Vec<String>) -> Self {
        Self {
            replies,
            next: AtomicUsize::new(0),
            error: None,
        }
    }

    /// Every call fails with `LlmError::Backend(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            replies: Vec::new(),
            next: AtomicUsize::new(0),
            error: Some(message.into()),
        }
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        if let Some(message) = &self.error {
            return Err(LlmError::Backend(message.clone()));
        }
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        self.replies
            .get(index.min(self.replies.len().saturating_sub(1)))
            .cloned()
            .ok_or(LlmError::EmptyCompletion)
    }
}
