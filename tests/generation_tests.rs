//! Tests for the tool loop using a scripted provider.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::MockProvider;
use expense_agent::error::AgentError;
use expense_agent::generation::{self, MAX_TOOL_ITERATIONS};
use expense_agent::tools::{AgentTool, AgentToolParameters, Tool, ToolExecutionContext};
use expense_agent::types::*;
use serde_json::json;

fn counting_tool(counter: Arc<AtomicUsize>) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        "lookup_rate",
        "Look up a mileage rate",
        AgentToolParameters::object()
            .string("region", "Region code", true)
            .build(),
        move |args, _ctx| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                let region = args.get_str("region")?.to_string();
                Ok::<_, AgentError>(json!({ "region": region, "rate": 0.45 }))
            }
        },
    ))
}

#[tokio::test]
async fn returns_text_without_tools() {
    let provider = MockProvider::new();
    provider.queue_response("Nothing to do.");

    let result = generation::generate_text(
        &provider,
        vec![ModelMessage::user("Hi")],
        GenerationSettings::default(),
        &[],
        &ToolExecutionContext::default(),
    )
    .await
    .unwrap();

    assert_eq!(result.text, "Nothing to do.");
    assert_eq!(result.steps.len(), 1);
    assert_eq!(result.finish_reason, Some(FinishReason::Stop));
    assert_eq!(result.messages.last().unwrap().role, Role::Assistant);
    let requests = provider.requests();
    assert!(requests.lock().unwrap()[0].tools.is_none());
}

#[tokio::test]
async fn executes_tool_and_feeds_result_back() {
    let provider = MockProvider::new();
    provider.queue_tool_call("call_1", "lookup_rate", json!({ "region": "UK" }));
    provider.queue_response("The UK rate is 0.45.");
    let counter = Arc::new(AtomicUsize::new(0));

    let result = generation::generate_text(
        &provider,
        vec![ModelMessage::user("What is the rate?")],
        GenerationSettings::default(),
        &[counting_tool(counter.clone())],
        &ToolExecutionContext::default(),
    )
    .await
    .unwrap();

    assert_eq!(result.text, "The UK rate is 0.45.");
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(result.steps.len(), 2);
    assert_eq!(result.usage.total_tokens, 45);

    let requests = provider.requests();
    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    let tools = requests[0].tools.as_ref().unwrap();
    assert_eq!(tools[0].name, "lookup_rate");

    let follow_up = &requests[1].messages;
    assert_eq!(follow_up.len(), 3);
    assert_eq!(follow_up[1].tool_calls()[0].id, "call_1");
    let tool_result = follow_up[2].tool_result_part().unwrap();
    assert_eq!(tool_result.tool_call_id, "call_1");
    assert!(!tool_result.is_error);
    assert_eq!(tool_result.result["rate"], 0.45);
}

#[tokio::test]
async fn unknown_tool_becomes_error_result() {
    let provider = MockProvider::new();
    provider.queue_tool_call("call_1", "delete_everything", json!({}));
    provider.queue_response("Sorry, I can't do that.");

    let result = generation::generate_text(
        &provider,
        vec![ModelMessage::user("go")],
        GenerationSettings::default(),
        &[],
        &ToolExecutionContext::default(),
    )
    .await
    .unwrap();

    let tool_result = result.tool_results().next().unwrap();
    assert!(tool_result.is_error);
    assert_eq!(tool_result.result["error"], "Tool 'delete_everything' not found");
    assert_eq!(result.text, "Sorry, I can't do that.");
}

#[tokio::test]
async fn invalid_arguments_never_reach_the_tool() {
    let provider = MockProvider::new();
    provider.queue_tool_call("call_1", "lookup_rate", json!({ "region": 7 }));
    provider.queue_response("done");
    let counter = Arc::new(AtomicUsize::new(0));

    let result = generation::generate_text(
        &provider,
        vec![ModelMessage::user("go")],
        GenerationSettings::default(),
        &[counting_tool(counter.clone())],
        &ToolExecutionContext::default(),
    )
    .await
    .unwrap();

    assert_eq!(counter.load(Ordering::SeqCst), 0);
    let tool_result = result.tool_results().next().unwrap();
    assert!(tool_result.is_error);
    assert!(tool_result.result["error"]
        .as_str()
        .unwrap()
        .contains("field 'region' expected type 'string'"));
}

#[tokio::test]
async fn provider_error_aborts_the_loop() {
    let provider = MockProvider::new();
    provider.queue_tool_call("call_1", "lookup_rate", json!({ "region": "UK" }));
    provider.queue_error(AgentError::api(500, "boom"));
    let counter = Arc::new(AtomicUsize::new(0));

    let err = generation::generate_text(
        &provider,
        vec![ModelMessage::user("go")],
        GenerationSettings::default(),
        &[counting_tool(counter.clone())],
        &ToolExecutionContext::default(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "API error (status 500): boom");
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn stops_at_iteration_limit() {
    let provider = MockProvider::new();
    for i in 0..MAX_TOOL_ITERATIONS + 5 {
        provider.queue_tool_call(&format!("call_{i}"), "lookup_rate", json!({ "region": "UK" }));
    }
    let counter = Arc::new(AtomicUsize::new(0));

    let result = generation::generate_text(
        &provider,
        vec![ModelMessage::user("loop forever")],
        GenerationSettings::default(),
        &[counting_tool(counter.clone())],
        &ToolExecutionContext::default(),
    )
    .await
    .unwrap();

    assert_eq!(result.steps.len(), MAX_TOOL_ITERATIONS);
    assert_eq!(counter.load(Ordering::SeqCst), MAX_TOOL_ITERATIONS);
    assert_eq!(result.finish_reason, Some(FinishReason::Length));
    assert!(result.hit_step_limit());
}
