//! Core data model: plans, run results, step outputs.
//!
//! A goal is a plain string; a plan is the ordered step list a [`crate::Planner`]
//! derives from it. The engine reads only `Step::task`; `tool_id` and `args`
//! belong to the executor.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Caller-supplied structured payload for one request. Never mutated after
/// creation; materialized to a scratch file before execution when non-empty.
pub type Context = serde_json::Map<String, Value>;

/// One unit of planned work.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Step {
    /// Human-readable task description; also the content of the step's
    /// Thought event.
    pub task: String,
    /// Registry id of the tool that should run this step, when the planner
    /// assigned one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_id: Option<String>,
    /// Arguments for the assigned tool. `Null` when not a tool step.
    #[serde(default)]
    pub args: Value,
}

impl Step {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            tool_id: None,
            args: Value::Null,
        }
    }

    pub fn with_tool(task: impl Into<String>, tool_id: impl Into<String>, args: Value) -> Self {
        Self {
            task: task.into(),
            tool_id: Some(tool_id.into()),
            args,
        }
    }
}

/// Ordered sequence of steps. Produced once per invocation, never mutated.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Plan {
    pub steps: Vec<Step>,
}

impl Plan {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Lifecycle state of one run. Transitions monotonically
/// Pending → InProgress → {Complete, Failed}.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Pending,
    InProgress,
    Complete,
    Failed,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Complete => "COMPLETE",
            Self::Failed => "FAILED",
        })
    }
}

/// Value carried by one named output.
#[derive(Clone, Debug, PartialEq)]
pub enum OutputValue {
    Text(String),
    Structured(Value),
    Empty,
}

/// One named output reported by the executor.
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutput {
    pub value: OutputValue,
}

impl StepOutput {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: OutputValue::Text(value.into()),
        }
    }

    pub fn structured(value: Value) -> Self {
        Self {
            value: OutputValue::Structured(value),
        }
    }

    pub fn empty() -> Self {
        Self {
            value: OutputValue::Empty,
        }
    }

    /// The textual value, when this output is text.
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            OutputValue::Text(s) => Some(s),
            OutputValue::Structured(_) | OutputValue::Empty => None,
        }
    }
}

/// The executor's report: terminal state plus named outputs in the order the
/// executor produced them. Insertion order is part of the contract — result
/// extraction walks it front to back.
#[derive(Clone, Debug)]
pub struct RunResult {
    pub state: RunState,
    outputs: Vec<(String, StepOutput)>,
}

impl RunResult {
    pub fn new(state: RunState) -> Self {
        Self {
            state,
            outputs: Vec::new(),
        }
    }

    /// Appends a named output. Keys are expected to be unique; a duplicate is
    /// kept and simply never reached by extraction.
    pub fn insert(&mut self, key: impl Into<String>, output: StepOutput) {
        self.outputs.push((key.into(), output));
    }

    /// Outputs in insertion order.
    pub fn outputs(&self) -> &[(String, StepOutput)] {
        &self.outputs
    }

    pub fn get(&self, key: &str) -> Option<&StepOutput> {
        self.outputs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, o)| o)
    }
}
