//! Chat-client abstraction and the Azure implementation.

pub mod azure;
pub mod http;
pub mod openai;

pub use azure::AzureAiChatClient;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::types::{AgentToolCall, FinishReason, GenerationSettings, ModelMessage, Usage};

/// A request sent to a model provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// One model reply.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub text: String,
    pub usage: Usage,
    pub tool_calls: Vec<AgentToolCall>,
    pub finish_reason: Option<FinishReason>,
}

/// A remote chat model. One call is one round trip.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "azure").
    fn provider_name(&self) -> &str;

    /// Deployment or model id this instance serves.
    fn model_id(&self) -> &str;

    async fn generate_text(&self, request: &ProviderRequest)
        -> Result<ProviderResponse, AgentError>;
}
