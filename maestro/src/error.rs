//! Typed errors at each capability boundary.
//!
//! One enum per seam so callers can branch on failure class instead of
//! pattern-matching message text. An extraction miss is not an error — the
//! runner surfaces it as a terminal event with a fixed message.

use thiserror::Error;

/// LLM completion failure.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("llm request build failed: {0}")]
    Request(String),
    #[error("llm backend: {0}")]
    Backend(String),
    #[error("llm returned an empty completion")]
    EmptyCompletion,
}

/// Planner capability failure. Fatal to the invocation: no plan, no events
/// besides the single terminal error.
#[derive(Error, Debug)]
pub enum PlanningError {
    #[error("goal is empty")]
    EmptyGoal,
    #[error("planner backend: {0}")]
    Backend(#[from] LlmError),
}

/// Executor infrastructure failure (network, backend). Distinct from a run
/// that terminates in `RunState::Failed`, which is a logical failure the
/// executor reports as data.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("executor backend: {0}")]
    Backend(#[from] LlmError),
}

/// Tool invocation failure.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    Unknown(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("llm: {0}")]
    Llm(#[from] LlmError),
}
