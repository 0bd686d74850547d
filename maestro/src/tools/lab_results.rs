//! Lab-results tool: read a JSON document of test values, build an analysis
//! prompt, ask the LLM for a patient-friendly explanation.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::error::ToolError;
use crate::llm::LlmClient;
use crate::tools::{Tool, ToolSpec};

/// Tool name for lab-results analysis.
pub const TOOL_LAB_RESULTS: &str = "lab_results";

/// Document keys describing the patient rather than a test value.
const PATIENT_FIELDS: [&str; 4] = ["PatientName", "PatientAge", "PatientSex", "PatientWeight"];

/// Analyzes and explains lab results from a JSON file in plain language.
pub struct LabResultsTool {
    llm: Arc<dyn LlmClient>,
}

impl LabResultsTool {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

/// Builds the analysis prompt: patient section from the well-known fields,
/// one line per remaining test value, then the reporting instructions.
fn build_prompt(document: &Map<String, Value>) -> String {
    let field = |name: &str| {
        document
            .get(name)
            .map(display_value)
            .unwrap_or_else(|| "Not provided".to_string())
    };
    let mut prompt = String::from("Patient Information:\n");
    prompt.push_str(&format!("- Name: {}\n", field("PatientName")));
    prompt.push_str(&format!("- Age: {}\n", field("PatientAge")));
    prompt.push_str(&format!("- Gender: {}\n", field("PatientSex")));
    prompt.push_str(&format!("- Weight: {} kg\n", field("PatientWeight")));

    prompt.push_str("\nLab Results:\n");
    for (name, value) in document {
        if PATIENT_FIELDS.contains(&name.as_str()) {
            continue;
        }
        prompt.push_str(&format!("- {}: {}\n", name, display_value(value)));
    }

    prompt.push_str(
        "\nAnalyze these lab results and provide a comprehensive, \
         patient-friendly explanation covering: what each test measures, \
         whether any values appear abnormal against standard reference \
         ranges, potential causes for abnormal values, recommended follow-up \
         actions or lifestyle changes, and any health concerns to discuss \
         with a healthcare provider. Format the response as a medical report \
         with sections for Overview, Test-by-test analysis, Abnormal \
         findings, Recommendations, and Follow-up actions. Provide the \
         analysis directly, without introductory phrases.\n",
    );
    prompt
}

/// JSON value as prompt text, without quoting strings.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl Tool for LabResultsTool {
    fn name(&self) -> &str {
        TOOL_LAB_RESULTS
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_LAB_RESULTS.to_string(),
            description: "Analyzes and explains blood test or lab results in plain language. \
                          Input is a path to a JSON file containing the results."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "json_file_path": {
                        "type": "string",
                        "description": "Path to the JSON file containing lab results."
                    }
                },
                "required": ["json_file_path"]
            }),
        }
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let path = args
            .get("json_file_path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidInput("missing json_file_path".to_string()))?;
        let content = std::fs::read_to_string(path)?;
        let document: Value = serde_json::from_str(&content)
            .map_err(|e| ToolError::InvalidInput(format!("invalid JSON in {}: {}", path, e)))?;
        let document = document
            .as_object()
            .ok_or_else(|| ToolError::InvalidInput(format!("{} is not a JSON object", path)))?;
        let prompt = build_prompt(document);
        Ok(self.llm.complete(&prompt).await?)
    }
}
