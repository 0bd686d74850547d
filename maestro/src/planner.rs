//! LLM-backed planner: goal in, ordered step list out.
//!
//! The LLM is asked for a JSON step list; anything unparseable falls back to a
//! single step carrying the whole goal, so a sloppy completion degrades the
//! plan rather than failing the invocation.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::PlanningError;
use crate::llm::LlmClient;
use crate::plan::{Context, Plan, Step};
use crate::tools::ToolSpec;
use crate::traits::Planner;

const PLAN_SYSTEM: &str = "You are a planner. Break the goal into a short ordered list of \
steps. Reply with JSON only, shaped as \
{\"steps\": [{\"task\": \"...\", \"tool_id\": \"...\", \"args\": {...}}]}. \
Set tool_id and args only when one of the available tools fits the step; \
otherwise omit them and the step's task will be answered by the model.";

/// Planner that prompts the LLM with the goal and the registered tool specs.
pub struct LlmPlanner {
    llm: Arc<dyn LlmClient>,
    tools: Vec<ToolSpec>,
}

impl LlmPlanner {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            tools: Vec::new(),
        }
    }

    /// Advertise tool specs in the planning prompt.
    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = tools;
        self
    }

    fn plan_prompt(&self, goal: &str, context: Option<&Context>) -> String {
        let mut prompt = String::from(PLAN_SYSTEM);
        if !self.tools.is_empty() {
            prompt.push_str("\n\nAvailable tools:\n");
            for spec in &self.tools {
                prompt.push_str(&format!("- {}: {}\n", spec.name, spec.description));
            }
        }
        if let Some(context) = context {
            let keys: Vec<&str> = context.keys().map(String::as_str).collect();
            prompt.push_str(&format!("\nContext keys available: {}\n", keys.join(", ")));
        }
        prompt.push_str(&format!("\nGoal: {}\n", goal));
        prompt
    }
}

/// Strips a surrounding Markdown code fence, if any.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_start_matches('\n')
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

/// Parses the completion into steps. Fallback: one step carrying the goal.
fn parse_steps(raw: &str, goal: &str) -> Vec<Step> {
    #[derive(serde::Deserialize)]
    struct RawStep {
        task: Option<String>,
        tool_id: Option<String>,
        #[serde(default)]
        args: Value,
    }
    #[derive(serde::Deserialize)]
    struct RawPlan {
        steps: Option<Vec<RawStep>>,
    }

    if let Ok(parsed) = serde_json::from_str::<RawPlan>(strip_code_fence(raw)) {
        let steps: Vec<Step> = parsed
            .steps
            .unwrap_or_default()
            .into_iter()
            .filter_map(|s| {
                let task = s.task.filter(|t| !t.trim().is_empty())?;
                Some(Step {
                    task,
                    tool_id: s.tool_id.filter(|t| !t.is_empty()),
                    args: s.args,
                })
            })
            .collect();
        if !steps.is_empty() {
            return steps;
        }
    }

    vec![Step::new(goal)]
}

#[async_trait]
impl Planner for LlmPlanner {
    async fn plan(&self, goal: &str, context: Option<&Context>) -> Result<Plan, PlanningError> {
        let goal = goal.trim();
        if goal.is_empty() {
            return Err(PlanningError::EmptyGoal);
        }
        let raw = self.llm.complete(&self.plan_prompt(goal, context)).await?;
        let steps = parse_steps(&raw, goal);
        tracing::debug!(step_count = steps.len(), "plan generated");
        Ok(Plan::new(steps))
    }
}
