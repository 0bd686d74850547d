//! Tool system: trait, specs, registry, and built-in tools.
//!
//! Tools are registered once at startup and treated as immutable for the
//! process lifetime; the planner advertises their specs to the LLM and the
//! executor calls them by id.

mod lab_results;
mod llm_tool;
mod read_file;
mod registry;

pub use lab_results::{LabResultsTool, TOOL_LAB_RESULTS};
pub use llm_tool::{LlmTool, TOOL_LLM};
pub use read_file::{ReadFileTool, TOOL_READ_FILE};
pub use registry::ToolRegistry;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::ToolError;

/// Machine-readable description of one tool, rendered into the planner prompt.
#[derive(Clone, Debug, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// A single capability callable by the executor.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique registry id.
    fn name(&self) -> &str;

    /// Spec advertised to the planner.
    fn spec(&self) -> ToolSpec;

    /// Executes the tool with JSON arguments, returning its text output.
    async fn call(&self, args: Value) -> Result<String, ToolError>;
}
