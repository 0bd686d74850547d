//! PlanRunner: one invocation = plan, execute, extract, stream.
//!
//! `handle` spawns the invocation task and hands back the receiving end of a
//! bounded event channel; backpressure from a slow consumer is the only
//! pacing. All Thought events are emitted upfront, before execution begins,
//! so a caller can render the plan while the executor works. Every failure
//! after streaming has started becomes a terminal Error event — the stream
//! never breaks mid-flight. Scratch release is bound to the invocation's
//! exit, not to any success path.

use std::path::PathBuf;
use std::sync::Arc;

use stream_event::AgentEvent;
use tokio::sync::mpsc;

use crate::extract::primary_output;
use crate::plan::{Context, RunState};
use crate::scratch::ContextScratch;
use crate::stream::{result_events, thought_events};
use crate::traits::{Executor, Planner};

/// Max events buffered between the invocation task and the consumer.
pub const EVENT_QUEUE_CAPACITY: usize = 128;

/// Placeholder in a goal that is replaced with the scratch document's path.
pub const CONTEXT_FILE_PLACEHOLDER: &str = "{context_file}";

const NO_RESULT_IN_OUTPUTS: &str = "No result found in the outputs";
const NO_RESULT: &str = "No result found";

/// Immutable engine wiring, injected at construction. Shared read-only across
/// invocations; each invocation's mutable state is its own.
#[derive(Clone)]
pub struct Environment {
    pub planner: Arc<dyn Planner>,
    pub executor: Arc<dyn Executor>,
    /// Directory for per-invocation scratch files.
    pub scratch_dir: PathBuf,
}

/// The orchestrator: owns the lifecycle of one goal from plan to streamed
/// result.
pub struct PlanRunner {
    env: Environment,
    queue_capacity: usize,
}

impl PlanRunner {
    pub fn new(env: Environment) -> Self {
        Self {
            env,
            queue_capacity: EVENT_QUEUE_CAPACITY,
        }
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Starts one invocation and returns its finite event sequence. Not
    /// restartable. Dropping the receiver stops emission early but never
    /// skips scratch release.
    pub fn handle(
        &self,
        goal: impl Into<String>,
        context: Option<Context>,
    ) -> mpsc::Receiver<AgentEvent> {
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let env = self.env.clone();
        tokio::spawn(run_invocation(env, goal.into(), context, tx));
        rx
    }
}

/// One invocation, start to finish. Owns the scratch handle so release runs
/// on every exit path; `Drop` covers unwinding.
async fn run_invocation(
    env: Environment,
    goal: String,
    context: Option<Context>,
    tx: mpsc::Sender<AgentEvent>,
) {
    let context = context.filter(|c| !c.is_empty());
    let mut scratch = None;
    let goal = match &context {
        Some(map) => match ContextScratch::acquire(&env.scratch_dir, map) {
            Ok(s) => {
                let goal = goal.replace(CONTEXT_FILE_PLACEHOLDER, &s.path().display().to_string());
                scratch = Some(s);
                goal
            }
            Err(e) => {
                let _ = tx
                    .send(AgentEvent::error(format!("context could not be prepared: {}", e)))
                    .await;
                return;
            }
        },
        None => goal,
    };

    drive(&env, &goal, context.as_ref(), &tx).await;

    if let Some(s) = scratch.as_mut() {
        s.release();
    }
}

/// Plans, streams thoughts, executes, streams the outcome. Failures become a
/// single terminal Error event; a dropped receiver ends emission quietly.
async fn drive(env: &Environment, goal: &str, context: Option<&Context>, tx: &mpsc::Sender<AgentEvent>) {
    let plan = match env.planner.plan(goal, context).await {
        Ok(plan) => plan,
        Err(e) => {
            let _ = tx.send(AgentEvent::error(e.to_string())).await;
            return;
        }
    };

    for event in thought_events(&plan) {
        if tx.send(event).await.is_err() {
            return;
        }
    }

    let result = match env.executor.run(&plan).await {
        Ok(result) => result,
        Err(e) => {
            let _ = tx
                .send(AgentEvent::error(format!("Execution failed: {}", e)))
                .await;
            return;
        }
    };

    match result.state {
        RunState::Complete if !result.outputs().is_empty() => {
            match primary_output(result.outputs()).and_then(|output| output.as_text()) {
                Some(text) => {
                    for event in result_events(text) {
                        if tx.send(event).await.is_err() {
                            return;
                        }
                    }
                }
                None => {
                    let _ = tx.send(AgentEvent::error(NO_RESULT_IN_OUTPUTS)).await;
                }
            }
        }
        RunState::Complete => {
            let _ = tx.send(AgentEvent::error(NO_RESULT)).await;
        }
        state => {
            let _ = tx
                .send(AgentEvent::error(format!("Execution failed with state: {}", state)))
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExecutionError, LlmError, PlanningError};
    use crate::plan::{Plan, RunResult, Step, StepOutput};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Planner returning a fixed plan (or error), recording the goal it saw.
    struct StaticPlanner {
        plan: Option<Plan>,
        seen_goal: Mutex<Option<String>>,
    }

    impl StaticPlanner {
        fn with_plan(plan: Plan) -> Self {
            Self {
                plan: Some(plan),
                seen_goal: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                plan: None,
                seen_goal: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl Planner for StaticPlanner {
        async fn plan(
            &self,
            goal: &str,
            _context: Option<&Context>,
        ) -> Result<Plan, PlanningError> {
            *self.seen_goal.lock().unwrap() = Some(goal.to_string());
            self.plan
                .clone()
                .ok_or(PlanningError::Backend(LlmError::Backend("planner down".into())))
        }
    }

    /// Executor returning a canned result or an infrastructure error.
    struct StaticExecutor {
        result: Option<RunResult>,
    }

    #[async_trait]
    impl Executor for StaticExecutor {
        async fn run(&self, _plan: &Plan) -> Result<RunResult, ExecutionError> {
            self.result
                .clone()
                .ok_or(ExecutionError::Backend(LlmError::Backend("boom".into())))
        }
    }

    fn env(planner: StaticPlanner, executor: StaticExecutor, dir: &std::path::Path) -> Environment {
        Environment {
            planner: Arc::new(planner),
            executor: Arc::new(executor),
            scratch_dir: dir.to_path_buf(),
        }
    }

    async fn collect(mut rx: mpsc::Receiver<AgentEvent>) -> Vec<AgentEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    fn three_step_plan() -> Plan {
        Plan::new(vec![Step::new("read"), Step::new("analyze"), Step::new("report")])
    }

    fn long_text() -> String {
        "finding ".repeat(20)
    }

    #[tokio::test]
    async fn thoughts_precede_result_chunks_in_plan_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut result = RunResult::new(RunState::Complete);
        result.insert("$analysis_1_output", StepOutput::text(format!("line one\nline two {}", long_text())));
        let runner = PlanRunner::new(env(
            StaticPlanner::with_plan(three_step_plan()),
            StaticExecutor { result: Some(result) },
            dir.path(),
        ));
        let events = collect(runner.handle("goal", None)).await;

        let thoughts: Vec<&str> = events[..3].iter().map(|e| e.content()).collect();
        assert_eq!(thoughts, vec!["read", "analyze", "report"]);
        assert!(matches!(events[0], AgentEvent::Thought { .. }));
        assert!(matches!(events[3], AgentEvent::Response { .. }));
        assert_eq!(events[3].content(), "line one");
        assert!(events.iter().all(|e| !e.is_error()));
    }

    #[tokio::test]
    async fn failed_run_state_yields_thoughts_then_one_error() {
        let dir = tempfile::tempdir().unwrap();
        let runner = PlanRunner::new(env(
            StaticPlanner::with_plan(three_step_plan()),
            StaticExecutor {
                result: Some(RunResult::new(RunState::Failed)),
            },
            dir.path(),
        ));
        let events = collect(runner.handle("goal", None)).await;
        assert_eq!(events.len(), 4);
        assert_eq!(events[3].content(), "Execution failed with state: FAILED");
        assert!(events[3].is_error());
    }

    #[tokio::test]
    async fn complete_with_no_outputs_reports_no_result() {
        let dir = tempfile::tempdir().unwrap();
        let runner = PlanRunner::new(env(
            StaticPlanner::with_plan(Plan::new(vec![Step::new("compute sum")])),
            StaticExecutor {
                result: Some(RunResult::new(RunState::Complete)),
            },
            dir.path(),
        ));
        let events = collect(runner.handle("add 1 + 2", None)).await;
        assert_eq!(events.last().unwrap().content(), "No result found");
    }

    #[tokio::test]
    async fn complete_with_only_short_outputs_reports_extraction_miss() {
        let dir = tempfile::tempdir().unwrap();
        let mut result = RunResult::new(RunState::Complete);
        result.insert("$calc", StepOutput::text("3"));
        let runner = PlanRunner::new(env(
            StaticPlanner::with_plan(Plan::new(vec![Step::new("compute sum")])),
            StaticExecutor { result: Some(result) },
            dir.path(),
        ));
        let events = collect(runner.handle("add 1 + 2", None)).await;
        assert_eq!(
            events.last().unwrap().content(),
            "No result found in the outputs"
        );
    }

    #[tokio::test]
    async fn executor_error_still_emits_thoughts_first() {
        let dir = tempfile::tempdir().unwrap();
        let runner = PlanRunner::new(env(
            StaticPlanner::with_plan(three_step_plan()),
            StaticExecutor { result: None },
            dir.path(),
        ));
        let events = collect(runner.handle("goal", None)).await;
        assert_eq!(events.len(), 4);
        assert!(events[..3].iter().all(|e| matches!(e, AgentEvent::Thought { .. })));
        assert!(events[3].is_error());
        assert!(events[3].content().contains("Execution failed"));
    }

    #[tokio::test]
    async fn planner_failure_is_a_single_error_event() {
        let dir = tempfile::tempdir().unwrap();
        let runner = PlanRunner::new(env(
            StaticPlanner::failing(),
            StaticExecutor { result: None },
            dir.path(),
        ));
        let events = collect(runner.handle("goal", None)).await;
        assert_eq!(events.len(), 1);
        assert!(events[0].is_error());
    }

    #[tokio::test]
    async fn scratch_is_released_after_a_successful_run() {
        let dir = tempfile::tempdir().unwrap();
        let planner = StaticPlanner::with_plan(Plan::new(vec![Step::new("analyze")]));
        let mut result = RunResult::new(RunState::Complete);
        result.insert("$analysis_0_output", StepOutput::text(long_text()));
        let env = Environment {
            planner: Arc::new(planner),
            executor: Arc::new(StaticExecutor { result: Some(result) }),
            scratch_dir: dir.path().to_path_buf(),
        };
        let runner = PlanRunner::new(env);

        let mut context = Context::new();
        context.insert("Hemoglobin".into(), serde_json::json!(13.5));
        let events = collect(runner.handle(
            format!("analyze the results from {}", CONTEXT_FILE_PLACEHOLDER),
            Some(context),
        ))
        .await;
        assert!(!events.is_empty());

        // Once the stream ends the invocation has finished and released.
        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert!(leftovers.is_empty(), "scratch file leaked: {:?}", leftovers);
    }

    #[tokio::test]
    async fn goal_placeholder_is_substituted_with_the_scratch_path() {
        let dir = tempfile::tempdir().unwrap();
        let planner = Arc::new(StaticPlanner::with_plan(Plan::new(vec![Step::new("a")])));
        let env = Environment {
            planner: planner.clone(),
            executor: Arc::new(StaticExecutor {
                result: Some(RunResult::new(RunState::Complete)),
            }),
            scratch_dir: dir.path().to_path_buf(),
        };
        let runner = PlanRunner::new(env);
        let mut context = Context::new();
        context.insert("k".into(), serde_json::json!("v"));
        let _ = collect(runner.handle(
            format!("analyze {}", CONTEXT_FILE_PLACEHOLDER),
            Some(context),
        ))
        .await;

        let seen = planner.seen_goal.lock().unwrap().clone().unwrap();
        assert!(!seen.contains(CONTEXT_FILE_PLACEHOLDER));
        assert!(seen.contains("scratch-"));
    }

    #[tokio::test]
    async fn empty_context_acquires_no_scratch() {
        let dir = tempfile::tempdir().unwrap();
        let runner = PlanRunner::new(env(
            StaticPlanner::with_plan(Plan::new(vec![Step::new("a")])),
            StaticExecutor {
                result: Some(RunResult::new(RunState::Complete)),
            },
            dir.path(),
        ));
        let _ = collect(runner.handle("goal", Some(Context::new()))).await;
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn scratch_is_released_when_the_executor_fails() {
        let dir = tempfile::tempdir().unwrap();
        let runner = PlanRunner::new(env(
            StaticPlanner::with_plan(three_step_plan()),
            StaticExecutor { result: None },
            dir.path(),
        ));
        let mut context = Context::new();
        context.insert("k".into(), serde_json::json!("v"));
        let events = collect(runner.handle("goal", Some(context))).await;
        assert!(events.last().unwrap().is_error());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn dropped_receiver_stops_emission_but_still_releases() {
        let dir = tempfile::tempdir().unwrap();
        let mut result = RunResult::new(RunState::Complete);
        result.insert("$analysis_0_output", StepOutput::text(long_text()));
        // Capacity 1 forces the invocation task to block on a consumer that
        // is gone, exercising the early-return path.
        let runner = PlanRunner::new(env(
            StaticPlanner::with_plan(three_step_plan()),
            StaticExecutor { result: Some(result) },
            dir.path(),
        ))
        .with_queue_capacity(1);
        let mut context = Context::new();
        context.insert("k".into(), serde_json::json!("v"));
        let rx = runner.handle("goal", Some(context));
        drop(rx);

        // Wait for the invocation task to notice and clean up.
        for _ in 0..100 {
            if std::fs::read_dir(dir.path()).unwrap().count() == 0 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
