//! maestro CLI: plan a goal, show the steps, confirm, run, print the stream.
//!
//! The plan is produced once and shown before anything runs; the confirmed
//! plan is then executed verbatim through a fixed planner, so what ran is
//! exactly what was approved.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;
use maestro::{
    AgentEvent, ChatOpenAI, Context, Environment, LabResultsTool, LlmClient, LlmPlanner, LlmTool,
    Plan, PlanRunner, Planner, PlanningError, ReadFileTool, StepExecutor, ToolRegistry,
    CONTEXT_FILE_PLACEHOLDER,
};

const DEFAULT_GOAL: &str = "Analyze the lab results from {context_file} and provide a \
comprehensive explanation. If any of the values suggest a specific health issue, diagnose it \
and suggest next steps to bring up with a professional health care provider.";

#[derive(Parser)]
#[command(name = "maestro", about = "Plan and run a goal against the maestro engine")]
struct Cli {
    /// Goal to plan and run. `{context_file}` is replaced with --data's path.
    #[arg(long, default_value = DEFAULT_GOAL)]
    goal: String,

    /// JSON document (e.g. lab results) referenced by the goal.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Run without asking for plan confirmation.
    #[arg(long)]
    yes: bool,
}

/// Planner that replays an already-approved plan.
struct FixedPlanner(Plan);

#[async_trait]
impl Planner for FixedPlanner {
    async fn plan(&self, _goal: &str, _context: Option<&Context>) -> Result<Plan, PlanningError> {
        Ok(self.0.clone())
    }
}

fn confirm_plan(plan: &Plan) -> bool {
    println!("Here are the steps in the generated plan:");
    for (index, step) in plan.steps.iter().enumerate() {
        match &step.tool_id {
            Some(tool) => println!("  {}. {} [{}]", index + 1, step.task, tool),
            None => println!("  {}. {}", index + 1, step.task),
        }
    }
    if std::env::var("CI").as_deref() == Ok("true") {
        return true;
    }
    println!("Are you happy with the plan? (y/n):");
    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    answer.trim() == "y"
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    config::load_env(None)?;
    let settings = config::Settings::from_env()?;
    let cli = Cli::parse();

    let goal = match &cli.data {
        Some(path) => {
            // Fail fast on an unreadable or malformed document, before any
            // model call is made.
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str::<serde_json::Value>(&content)?;
            cli.goal
                .replace(CONTEXT_FILE_PLACEHOLDER, &path.display().to_string())
        }
        None => cli.goal.clone(),
    };

    let llm: Arc<dyn LlmClient> = Arc::new(ChatOpenAI::with_api_key(
        settings.openai_api_key.clone(),
        settings.model.clone(),
    ));
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(LabResultsTool::new(llm.clone())));
    registry.register(Arc::new(ReadFileTool));
    registry.register(Arc::new(LlmTool::new(llm.clone())));
    let registry = Arc::new(registry);

    let planner = LlmPlanner::new(llm.clone()).with_tools(registry.specs());
    let plan = planner.plan(&goal, None).await?;

    if !cli.yes && !confirm_plan(&plan) {
        std::process::exit(1);
    }

    let runner = PlanRunner::new(Environment {
        planner: Arc::new(FixedPlanner(plan)),
        executor: Arc::new(StepExecutor::new(registry, llm)),
        scratch_dir: settings.scratch_dir.clone(),
    });

    let mut rx = runner.handle(goal, None);
    let mut failed = false;
    while let Some(event) = rx.recv().await {
        match event {
            AgentEvent::Thought { content } => eprintln!("· {}", content),
            AgentEvent::Response { content } => println!("{}", content),
            AgentEvent::Error { content } => {
                eprintln!("error: {}", content);
                failed = true;
            }
        }
    }
    if failed {
        std::process::exit(1);
    }
    Ok(())
}
