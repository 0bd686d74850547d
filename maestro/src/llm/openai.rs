//! OpenAI Chat Completions client implementing [`LlmClient`].
//!
//! Single-turn usage: the prompt goes out as one user message and the first
//! choice's content comes back. Requires an API key (explicit config, or
//! `OPENAI_API_KEY` via the default client).

use async_trait::async_trait;
use tracing::debug;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
        CreateChatCompletionRequestArgs,
    },
    Client,
};

use crate::error::LlmError;
use crate::llm::LlmClient;

/// OpenAI-compatible Chat Completions client.
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
}

impl ChatOpenAI {
    /// Build with the default config (API key from `OPENAI_API_KEY`).
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_config(OpenAIConfig::default(), model)
    }

    /// Build with an explicit API key and the default base URL.
    pub fn with_api_key(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_config(OpenAIConfig::new().with_api_key(api_key.into()), model)
    }

    /// Build with explicit config (API key, custom base URL).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            temperature: None,
        }
    }

    /// Set sampling temperature (0–2); lower is more deterministic.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let messages = vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage::from(prompt),
        )];
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(messages);
        if let Some(t) = self.temperature {
            args.temperature(t);
        }
        let request = args.build().map_err(|e| LlmError::Request(e.to_string()))?;

        debug!(model = %self.model, prompt_len = prompt.len(), "chat completion create");
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LlmError::Backend(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyCompletion)
    }
}
