//! Capability traits at the engine's seams: planning and execution.
//!
//! The runner depends only on these; concrete implementations ([`crate::LlmPlanner`],
//! [`crate::StepExecutor`]) live behind them so tests can drive the whole
//! lifecycle with mocks.

use async_trait::async_trait;

use crate::error::{ExecutionError, PlanningError};
use crate::plan::{Context, Plan, RunResult};

/// Turns a goal (plus optional caller context) into an ordered plan.
#[async_trait]
pub trait Planner: Send + Sync {
    async fn plan(&self, goal: &str, context: Option<&Context>) -> Result<Plan, PlanningError>;
}

/// Runs a plan to a terminal state, reporting named step outputs.
///
/// Logical step failures end in `RunState::Failed` with the outputs collected
/// so far; `Err` is reserved for infrastructure failure. The call may block
/// for seconds to minutes; the engine imposes no timeout of its own.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn run(&self, plan: &Plan) -> Result<RunResult, ExecutionError>;
}
