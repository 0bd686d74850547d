//! Step executor: runs a plan in order against the tool registry and the LLM.
//!
//! Output keys follow the `$step_{i}_output` scheme; the step that ran the
//! lab-results tool is keyed `$analysis_{i}_output` so result extraction can
//! prefer it. A tool failure terminates the run in `Failed` (logical failure);
//! an LLM transport failure is an `ExecutionError`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ExecutionError;
use crate::llm::LlmClient;
use crate::plan::{Plan, RunResult, RunState, StepOutput};
use crate::tools::{ToolRegistry, TOOL_LAB_RESULTS};
use crate::traits::Executor;

/// Key for the output of step `index`.
pub fn step_output_key(index: usize) -> String {
    format!("$step_{}_output", index)
}

/// Key for the output of the primary analysis step at `index`.
pub fn analysis_output_key(index: usize) -> String {
    format!("$analysis_{}_output", index)
}

/// Executor that walks the plan sequentially: tool steps go to the registry,
/// free-form steps to the LLM.
pub struct StepExecutor {
    tools: Arc<ToolRegistry>,
    llm: Arc<dyn LlmClient>,
}

impl StepExecutor {
    pub fn new(tools: Arc<ToolRegistry>, llm: Arc<dyn LlmClient>) -> Self {
        Self { tools, llm }
    }
}

#[async_trait]
impl Executor for StepExecutor {
    async fn run(&self, plan: &Plan) -> Result<RunResult, ExecutionError> {
        let mut result = RunResult::new(RunState::Pending);
        result.state = RunState::InProgress;

        for (index, step) in plan.steps.iter().enumerate() {
            let tool = step.tool_id.as_deref().and_then(|id| self.tools.get(id));
            match tool {
                Some(tool) => {
                    tracing::debug!(step = index, tool = tool.name(), "running tool step");
                    match tool.call(step.args.clone()).await {
                        Ok(text) => {
                            let key = if tool.name() == TOOL_LAB_RESULTS {
                                analysis_output_key(index)
                            } else {
                                step_output_key(index)
                            };
                            result.insert(key, StepOutput::text(text));
                        }
                        Err(e) => {
                            tracing::warn!(step = index, tool = tool.name(), "tool failed: {}", e);
                            result.insert(
                                step_output_key(index),
                                StepOutput::text(format!("step failed: {}", e)),
                            );
                            result.state = RunState::Failed;
                            return Ok(result);
                        }
                    }
                }
                None => {
                    if let Some(id) = step.tool_id.as_deref() {
                        tracing::debug!(step = index, tool = id, "unknown tool, using llm");
                    }
                    let text = self.llm.complete(&step.task).await?;
                    result.insert(step_output_key(index), StepOutput::text(text));
                }
            }
        }

        result.state = RunState::Complete;
        Ok(result)
    }
}
