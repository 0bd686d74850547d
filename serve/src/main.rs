//! maestro-serve: wire the engine from environment settings and serve HTTP.

use std::sync::Arc;

use maestro::{
    ChatOpenAI, Environment, LabResultsTool, LlmClient, LlmPlanner, LlmTool, PlanRunner,
    ReadFileTool, StepExecutor, ToolRegistry,
};
use serve::{run_serve, serve_config_from_env, AppState};

fn build_state(settings: &config::Settings) -> Arc<AppState> {
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
    let executor = StepExecutor::new(registry, llm);
    let runner = PlanRunner::new(Environment {
        planner: Arc::new(planner),
        executor: Arc::new(executor),
        scratch_dir: settings.scratch_dir.clone(),
    })
    .with_queue_capacity(serve_config_from_env().event_queue_capacity);

    Arc::new(AppState {
        runner,
        patient_data: settings.patient_data.clone(),
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    config::load_env(None)?;
    // Missing credentials are fatal here, before any request is served.
    let settings = config::Settings::from_env()?;
    let state = build_state(&settings);
    run_serve(settings.addr, state).await
}
