//! Read-file tool: return the text content of a file by path.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::tools::{Tool, ToolSpec};

/// Tool name for reading a file.
pub const TOOL_READ_FILE: &str = "read_file";

/// Reads the entire UTF-8 content of a file. Steps use this to pull the
/// invocation's scratch document (or any other data file) into the run.
pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        TOOL_READ_FILE
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_READ_FILE.to_string(),
            description: "Reads the entire text content of a file at the given path.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Path of the file to read."
                    }
                },
                "required": ["path"]
            }),
        }
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let path = args
            .get("path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidInput("missing path".to_string()))?;
        Ok(std::fs::read_to_string(path)?)
    }
}
