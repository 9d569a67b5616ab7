//! Core ChatAgent struct.

use std::fmt;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::error::AgentError;
use crate::generation;
use crate::provider::ModelProvider;
use crate::tools::tool::{Tool, ToolExecutionContext};
use crate::types::*;

/// An agent: a name, standing instructions, the tools it may call and the
/// client it talks through. Keeps no state between runs.
pub struct ChatAgent {
    name: String,
    instructions: Option<String>,
    client: Box<dyn ModelProvider>,
    tools: Vec<Arc<dyn Tool>>,
    settings: GenerationSettings,
}

impl ChatAgent {
    pub fn new(name: impl Into<String>, client: Box<dyn ModelProvider>) -> Self {
        Self {
            name: name.into(),
            instructions: None,
            client,
            tools: Vec::new(),
            settings: GenerationSettings::default(),
        }
    }

    /// Sent as the system message of every run.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Submit one user message and wait for the final reply.
    pub async fn run(&self, prompt: impl Into<String>) -> Result<AgentResponse, AgentError> {
        let run_id = Uuid::new_v4();
        info!(
            agent = %self.name,
            %run_id,
            model = self.client.model_id(),
            "agent run started"
        );

        let mut messages = Vec::with_capacity(2);
        if let Some(ref instructions) = self.instructions {
            messages.push(ModelMessage::system(instructions.clone()));
        }
        messages.push(ModelMessage::user(prompt));

        let ctx = ToolExecutionContext {
            agent_name: Some(self.name.clone()),
            run_id: Some(run_id),
        };
        let result = generation::generate_text(
            self.client.as_ref(),
            messages,
            self.settings.clone(),
            &self.tools,
            &ctx,
        )
        .await?;

        info!(
            %run_id,
            steps = result.steps.len(),
            tool_calls = result.tool_calls().count(),
            total_tokens = result.usage.total_tokens,
            "agent run finished"
        );
        Ok(AgentResponse { run_id, result })
    }
}

impl fmt::Debug for ChatAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatAgent")
            .field("name", &self.name)
            .field("model", &self.client.model_id())
            .field("tools", &self.tool_names())
            .finish()
    }
}

/// The agent's final reply. Displays as its text.
#[derive(Debug, Clone)]
pub struct AgentResponse {
    pub run_id: Uuid,
    pub result: GenerateTextResult,
}

impl AgentResponse {
    pub fn text(&self) -> &str {
        &self.result.text
    }
}

impl fmt::Display for AgentResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.result.text)
    }
}
