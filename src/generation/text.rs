//! Text generation with a client-side tool loop.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::AgentError;
use crate::provider::{ModelProvider, ProviderRequest, ToolDefinition};
use crate::tools::tool::{Tool, ToolExecutionContext};
use crate::tools::validation::validate_arguments;
use crate::tools::ToolArguments;
use crate::types::*;

/// Upper bound on model calls within one run.
pub const MAX_TOOL_ITERATIONS: usize = 20;

/// Call the provider, execute any requested tools, feed the results back,
/// and repeat until the model answers without tool calls.
///
/// Tool failures do not abort the loop: they go back to the model as
/// `{"error": ...}` results. Provider failures abort immediately.
pub async fn generate_text(
    provider: &dyn ModelProvider,
    mut messages: Vec<ModelMessage>,
    settings: GenerationSettings,
    tools: &[Arc<dyn Tool>],
    ctx: &ToolExecutionContext,
) -> Result<GenerateTextResult, AgentError> {
    let tool_defs: Option<Vec<ToolDefinition>> = (!tools.is_empty()).then(|| {
        tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters().schema.clone(),
            })
            .collect()
    });

    let mut steps = Vec::new();
    let mut total_usage = Usage::default();

    for iteration in 0..MAX_TOOL_ITERATIONS {
        let request = ProviderRequest {
            messages: messages.clone(),
            settings: settings.clone(),
            tools: tool_defs.clone(),
        };

        debug!(iteration, provider = provider.provider_name(), "generate_text: calling provider");
        let response = provider.generate_text(&request).await?;
        total_usage.merge(&response.usage);

        if response.tool_calls.is_empty() {
            messages.push(ModelMessage::assistant(response.text.clone()));
            steps.push(GenerationStep {
                text: response.text.clone(),
                tool_calls: Vec::new(),
                tool_results: Vec::new(),
                usage: response.usage,
                finish_reason: response.finish_reason,
            });
            return Ok(GenerateTextResult {
                text: response.text,
                steps,
                messages,
                usage: total_usage,
                finish_reason: response.finish_reason,
            });
        }

        messages.push(ModelMessage::assistant_tool_calls(
            &response.text,
            &response.tool_calls,
        ));

        let mut tool_results = Vec::with_capacity(response.tool_calls.len());
        for call in &response.tool_calls {
            let result = execute_tool_call(tools, call, ctx).await;
            messages.push(ModelMessage::tool_result(
                result.tool_call_id.clone(),
                result.result.clone(),
                result.is_error,
            ));
            tool_results.push(result);
        }

        steps.push(GenerationStep {
            text: response.text,
            tool_calls: response.tool_calls,
            tool_results,
            usage: response.usage,
            finish_reason: response.finish_reason,
        });
    }

    warn!(limit = MAX_TOOL_ITERATIONS, "tool loop hit iteration limit");
    let last_text = steps.last().map(|s| s.text.clone()).unwrap_or_default();
    Ok(GenerateTextResult {
        text: last_text,
        steps,
        messages,
        usage: total_usage,
        finish_reason: Some(FinishReason::Length),
    })
}

async fn execute_tool_call(
    tools: &[Arc<dyn Tool>],
    call: &AgentToolCall,
    ctx: &ToolExecutionContext,
) -> AgentToolResult {
    let outcome = match tools.iter().find(|t| t.name() == call.name) {
        None => Err(format!("Tool '{}' not found", call.name)),
        Some(tool) => {
            let args = ToolArguments::new(call.arguments.clone());
            match validate_arguments(args.raw(), &tool.parameters().schema) {
                Err(reason) => Err(format!("Invalid arguments for '{}': {reason}", call.name)),
                Ok(()) => tool.execute(&args, ctx).await.map_err(|e| e.to_string()),
            }
        }
    };

    match outcome {
        Ok(result) => AgentToolResult {
            tool_call_id: call.id.clone(),
            result,
            is_error: false,
        },
        Err(message) => {
            warn!(tool = %call.name, error = %message, "tool call failed");
            AgentToolResult {
                tool_call_id: call.id.clone(),
                result: serde_json::json!({ "error": message }),
                is_error: true,
            }
        }
    }
}
