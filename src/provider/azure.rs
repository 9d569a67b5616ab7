//! Azure AI Foundry / Azure OpenAI chat client.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::auth::TokenCredential;
use crate::config::AgentConfig;
use crate::error::AgentError;

use super::http::{bearer_headers, shared_client, status_to_error};
use super::openai::{build_request_body, into_provider_response, ChatResponse};
use super::{ModelProvider, ProviderRequest, ProviderResponse};

/// Chat completions against one model deployment, authorised with
/// Entra ID bearer tokens from a [`TokenCredential`].
pub struct AzureAiChatClient {
    url: String,
    deployment: String,
    scope: String,
    credential: Arc<dyn TokenCredential>,
}

impl AzureAiChatClient {
    /// `endpoint`: resource or Foundry project endpoint, e.g.
    /// "https://myres.services.ai.azure.com/api/projects/lab".
    /// `deployment`: e.g. "gpt-4o". `api_version`: e.g. "2024-10-21".
    pub fn new(
        endpoint: &str,
        deployment: impl Into<String>,
        api_version: &str,
        scope: impl Into<String>,
        credential: Arc<dyn TokenCredential>,
    ) -> Self {
        let deployment = deployment.into();
        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            resource_base(endpoint),
            deployment,
            api_version
        );
        Self {
            url,
            deployment,
            scope: scope.into(),
            credential,
        }
    }

    /// Fails when the endpoint or deployment name is not configured.
    pub fn from_config(
        config: &AgentConfig,
        credential: Arc<dyn TokenCredential>,
    ) -> Result<Self, AgentError> {
        let endpoint = config.require_endpoint()?;
        let deployment = config.require_deployment()?;
        Ok(Self::new(
            endpoint,
            deployment,
            &config.api_version,
            config.token_scope.clone(),
            credential,
        ))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Strip a trailing slash and any Foundry `/api/projects/<name>` suffix;
/// deployments are addressed from the resource root.
pub fn resource_base(endpoint: &str) -> &str {
    let trimmed = endpoint.trim().trim_end_matches('/');
    match trimmed.find("/api/projects") {
        Some(idx) => &trimmed[..idx],
        None => trimmed,
    }
}

#[async_trait]
impl ModelProvider for AzureAiChatClient {
    fn provider_name(&self) -> &str {
        "azure"
    }

    fn model_id(&self) -> &str {
        &self.deployment
    }

    async fn generate_text(&self, request: &ProviderRequest) -> Result<ProviderResponse, AgentError> {
        let token = self.credential.get_token(&self.scope).await?;
        let body = build_request_body(request, None);

        debug!(
            deployment = %self.deployment,
            messages = request.messages.len(),
            "Azure generate_text"
        );

        let resp = shared_client()
            .post(&self.url)
            .headers(bearer_headers(&token.token))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status.as_u16(), &body_text));
        }

        let data: ChatResponse = resp.json().await?;
        into_provider_response(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AccessToken, StaticTokenCredential};
    use chrono::Utc;

    fn credential() -> Arc<dyn TokenCredential> {
        Arc::new(StaticTokenCredential::new(AccessToken::new("t", Utc::now())))
    }

    #[test]
    fn project_endpoint_reduces_to_resource_root() {
        assert_eq!(
            resource_base("https://res.services.ai.azure.com/api/projects/lab-project/"),
            "https://res.services.ai.azure.com"
        );
        assert_eq!(
            resource_base("https://res.openai.azure.com/"),
            "https://res.openai.azure.com"
        );
    }

    #[test]
    fn builds_deployment_url() {
        let client = AzureAiChatClient::new(
            "https://res.openai.azure.com",
            "gpt-4o",
            "2024-10-21",
            "scope",
            credential(),
        );

        assert_eq!(
            client.url(),
            "https://res.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-10-21"
        );
        assert_eq!(client.model_id(), "gpt-4o");
    }

    #[test]
    fn from_config_requires_endpoint() {
        let config = AgentConfig::default().with_deployment("gpt-4o");

        let err = match AzureAiChatClient::from_config(&config, credential()) {
            Ok(_) => panic!("expected configuration error"),
            Err(err) => err,
        };

        assert!(err.to_string().contains("PROJECT_ENDPOINT"));
    }
}
