//! LLM client abstraction: one completion call, prompt in, text out.
//!
//! The planner, the executor's free-form steps, and the lab-results tool all
//! go through [`LlmClient`]. Implementations: [`MockLlm`] (fixed replies, for
//! tests) and [`ChatOpenAI`] (OpenAI-compatible Chat Completions API).

mod mock;
mod openai;

pub use mock::MockLlm;
pub use openai::ChatOpenAI;

use async_trait::async_trait;

use crate::error::LlmError;

/// One-shot completion client.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Completes `prompt` and returns the assistant text.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}
