//! Plain LLM tool: forward a prompt to the model, return the completion.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::llm::LlmClient;
use crate::tools::{Tool, ToolSpec};

/// Tool name for the plain completion tool.
pub const TOOL_LLM: &str = "llm";

/// Forwards a prompt to the LLM. Gives the planner a general-purpose step for
/// summarizing, rewriting, or reasoning over earlier output.
pub struct LlmTool {
    llm: Arc<dyn LlmClient>,
}

impl LlmTool {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Tool for LlmTool {
    fn name(&self) -> &str {
        TOOL_LLM
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_LLM.to_string(),
            description: "Sends a prompt to the language model and returns the completion."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "prompt": {
                        "type": "string",
                        "description": "Prompt to complete."
                    }
                },
                "required": ["prompt"]
            }),
        }
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let prompt = args
            .get("prompt")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidInput("missing prompt".to_string()))?;
        Ok(self.llm.complete(prompt).await?)
    }
}
