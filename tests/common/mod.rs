//! Shared test helpers: a scripted provider and a capturing writer.

#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use expense_agent::error::AgentError;
use expense_agent::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use expense_agent::types::*;

/// A provider that replays queued responses in order and records requests.
#[derive(Default)]
pub struct MockProvider {
    responses: Mutex<Vec<Result<ProviderResponse, AgentError>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a final text response.
    pub fn queue_response(&self, text: &str) {
        self.responses.lock().unwrap().push(Ok(ProviderResponse {
            text: text.to_string(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
                total_tokens: 30,
            },
            tool_calls: vec![],
            finish_reason: Some(FinishReason::Stop),
        }));
    }

    /// Queue a tool call response.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: serde_json::Value) {
        self.responses.lock().unwrap().push(Ok(ProviderResponse {
            text: String::new(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
                total_tokens: 15,
            },
            tool_calls: vec![AgentToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments: args,
            }],
            finish_reason: Some(FinishReason::ToolCalls),
        }));
    }

    pub fn queue_error(&self, error: AgentError) {
        self.responses.lock().unwrap().push(Err(error));
    }

    /// Handle on the recorded requests that survives boxing the provider.
    pub fn requests(&self) -> Arc<Mutex<Vec<ProviderRequest>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        "mock-model"
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, AgentError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(ProviderResponse {
                text: "Mock response".to_string(),
                usage: Usage::default(),
                tool_calls: vec![],
                finish_reason: Some(FinishReason::Stop),
            });
        }
        responses.remove(0)
    }
}

/// Cloneable in-memory writer.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// The user text of the last message in a request.
pub fn last_user_text(request: &ProviderRequest) -> String {
    request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.text())
        .unwrap_or_default()
}
