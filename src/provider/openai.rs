//! OpenAI chat-completions wire format (request bodies and responses).
//!
//! Azure OpenAI deployments speak this format; the model is chosen by the
//! URL instead of the `model` field.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::AgentError;
use crate::types::*;

use super::{ProviderRequest, ProviderResponse};

/// Build a chat-completions request body. `model` is omitted when `None`.
pub fn build_request_body(request: &ProviderRequest, model: Option<&str>) -> Value {
    let mut obj = Map::new();
    if let Some(model) = model {
        obj.insert("model".into(), model.into());
    }
    obj.insert(
        "messages".into(),
        request.messages.iter().map(message_to_openai).collect::<Vec<_>>().into(),
    );

    let settings = &request.settings;
    if let Some(max) = settings.max_tokens {
        obj.insert("max_tokens".into(), max.into());
    }
    if let Some(temp) = settings.temperature {
        obj.insert("temperature".into(), temp.into());
    }
    if let Some(top_p) = settings.top_p {
        obj.insert("top_p".into(), top_p.into());
    }
    if let Some(seed) = settings.seed {
        obj.insert("seed".into(), seed.into());
    }
    if let Some(ref user) = settings.user {
        obj.insert("user".into(), user.clone().into());
    }

    if let Some(tools) = request.tools.as_ref().filter(|t| !t.is_empty()) {
        let tool_defs: Vec<Value> = tools
            .iter()
            .map(|t| {
                json!({
                    "type": "function",
                    "function": {
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters,
                    }
                })
            })
            .collect();
        obj.insert("tools".into(), tool_defs.into());
    }

    Value::Object(obj)
}

fn message_to_openai(msg: &ModelMessage) -> Value {
    let role = msg.role.as_ref();

    if let Some(tr) = msg.tool_result_part() {
        let content = match &tr.result {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return json!({
            "role": "tool",
            "tool_call_id": tr.tool_call_id,
            "content": content,
        });
    }

    let tool_calls = msg.tool_calls();
    if !tool_calls.is_empty() {
        let tc_json: Vec<Value> = tool_calls
            .iter()
            .map(|tc| {
                json!({
                    "id": tc.id,
                    "type": "function",
                    "function": {
                        "name": tc.name,
                        "arguments": arguments_to_wire(&tc.arguments),
                    }
                })
            })
            .collect();
        let text = msg.text();
        return json!({
            "role": role,
            "content": if text.is_empty() { Value::Null } else { Value::String(text) },
            "tool_calls": tc_json,
        });
    }

    json!({ "role": role, "content": msg.text() })
}

/// The API expects arguments as a JSON-encoded string.
fn arguments_to_wire(arguments: &Value) -> String {
    match arguments {
        Value::String(raw) => raw.clone(),
        other => other.to_string(),
    }
}

/// Turn a decoded chat-completions response into a [`ProviderResponse`].
pub fn into_provider_response(data: ChatResponse) -> Result<ProviderResponse, AgentError> {
    let choice = data
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AgentError::api(200, "No choices in chat completion response"))?;

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| AgentToolCall {
            id: tc.id,
            name: tc.function.name,
            arguments: serde_json::from_str(&tc.function.arguments)
                .unwrap_or(Value::String(tc.function.arguments)),
        })
        .collect();

    Ok(ProviderResponse {
        text: choice.message.content.unwrap_or_default(),
        usage: data
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default(),
        tool_calls,
        finish_reason: choice
            .finish_reason
            .as_deref()
            .and_then(|s| s.parse::<FinishReason>().ok()),
    })
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ChatToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ChatToolCall {
    id: String,
    function: ChatFunction,
}

#[derive(Debug, Deserialize)]
struct ChatFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
