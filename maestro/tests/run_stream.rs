//! End-to-end engine test: LlmPlanner + StepExecutor + PlanRunner with a
//! scripted LLM, consumed through the event channel like a transport would.

use std::sync::Arc;

use maestro::{
    AgentEvent, Context, Environment, LabResultsTool, LlmPlanner, MockLlm, PlanRunner,
    StepExecutor, ToolRegistry, CONTEXT_FILE_PLACEHOLDER,
};

async fn collect(mut rx: tokio::sync::mpsc::Receiver<AgentEvent>) -> Vec<AgentEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

fn lab_document() -> serde_json::Value {
    serde_json::json!({
        "PatientName": "Jo Doe",
        "Hemoglobin": 9.1,
        "WBC": "11.2 x10^9/L"
    })
}

#[tokio::test]
async fn goal_with_context_streams_thoughts_then_analysis_lines() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("doc.json");
    std::fs::write(&data, lab_document().to_string()).unwrap();

    let analysis = format!(
        "Overview: hemoglobin is low.\nRecommendation: discuss iron studies.\n{}",
        "Detail. ".repeat(20)
    );
    // First completion answers the planning prompt, second the analysis.
    let plan_reply = format!(
        r#"{{"steps": [
            {{"task": "analyze the lab results", "tool_id": "lab_results",
              "args": {{"json_file_path": "{}"}}}}
        ]}}"#,
        data.display()
    );
    let llm = Arc::new(MockLlm::with_replies(vec![plan_reply, analysis.clone()]));

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(LabResultsTool::new(llm.clone())));
    let registry = Arc::new(registry);

    let scratch_dir = dir.path().join("scratch");
    std::fs::create_dir(&scratch_dir).unwrap();
    let runner = PlanRunner::new(Environment {
        planner: Arc::new(LlmPlanner::new(llm.clone()).with_tools(registry.specs())),
        executor: Arc::new(StepExecutor::new(registry, llm.clone())),
        scratch_dir: scratch_dir.clone(),
    });

    let mut context = Context::new();
    context.insert("Hemoglobin".into(), serde_json::json!(9.1));
    let events = collect(runner.handle(
        format!("analyze the lab results in {}", CONTEXT_FILE_PLACEHOLDER),
        Some(context),
    ))
    .await;

    assert!(matches!(events[0], AgentEvent::Thought { .. }));
    assert_eq!(events[0].content(), "analyze the lab results");
    let chunks: Vec<String> = events[1..]
        .iter()
        .map(|e| {
            assert!(matches!(e, AgentEvent::Response { .. }));
            e.content().to_string()
        })
        .collect();
    assert_eq!(chunks.join("\n"), analysis);

    // Scratch was released once the stream ended.
    assert_eq!(std::fs::read_dir(&scratch_dir).unwrap().count(), 0);
}

#[tokio::test]
async fn short_answer_ends_in_extraction_miss() {
    let dir = tempfile::tempdir().unwrap();
    let llm = Arc::new(MockLlm::with_replies(vec![
        r#"{"steps": [{"task": "compute sum"}]}"#.into(),
        "3".into(),
    ]));
    let runner = PlanRunner::new(Environment {
        planner: Arc::new(LlmPlanner::new(llm.clone())),
        executor: Arc::new(StepExecutor::new(Arc::new(ToolRegistry::new()), llm)),
        scratch_dir: dir.path().to_path_buf(),
    });
    let events = collect(runner.handle("add 1 + 2", None)).await;
    assert_eq!(events[0].content(), "compute sum");
    let last = events.last().unwrap();
    assert!(last.is_error());
    assert_eq!(last.content(), "No result found in the outputs");
}
