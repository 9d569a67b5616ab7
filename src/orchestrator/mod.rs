//! Expense-claim run: one prompt, one agent, one printed reply.

use std::io::Write;
use std::sync::Arc;

use tracing::warn;

use crate::agent::{AgentResponse, ChatAgent};
use crate::auth::{AzureCliCredential, ScopedCredential, TokenCredential};
use crate::config::AgentConfig;
use crate::data::ExpenseDocument;
use crate::error::AgentError;
use crate::provider::{AzureAiChatClient, ModelProvider};
use crate::tools::{EmailSender, SendEmailTool};

pub const AGENT_NAME: &str = "expenses_agent";

pub const EXPENSES_INSTRUCTIONS: &str = "You are an AI assistant for expense claim submission. \
When a user submits expenses data and requests an expense claim, use the plug-in function to \
send an email to expenses@contoso.com with the subject 'Expense Claim' and a body that contains \
itemized expenses with a total. Then confirm to the user that you've done so.";

/// The single message sent to the agent.
pub fn build_prompt(instruction: &str, document: &ExpenseDocument) -> String {
    format!("{instruction}: {document}")
}

/// The expenses agent with the email tool as its only capability.
pub fn expenses_agent(client: Box<dyn ModelProvider>, sender: Arc<dyn EmailSender>) -> ChatAgent {
    ChatAgent::new(AGENT_NAME, client)
        .with_instructions(EXPENSES_INSTRUCTIONS)
        .with_tool(Arc::new(SendEmailTool::new(sender)))
}

/// How a run ended. Failures are already printed when this is returned.
#[derive(Debug)]
pub enum RunOutcome {
    /// Blank instruction; nothing was sent.
    Skipped,
    Completed(AgentResponse),
    Failed(String),
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

pub struct Orchestrator {
    config: AgentConfig,
    sender: Arc<dyn EmailSender>,
}

impl Orchestrator {
    pub fn new(config: AgentConfig, sender: Arc<dyn EmailSender>) -> Self {
        Self { config, sender }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Run against Azure using the signed-in Azure CLI account.
    pub async fn process<W: Write>(
        &self,
        instruction: &str,
        document: &ExpenseDocument,
        out: &mut W,
    ) -> RunOutcome {
        let credential = Arc::new(AzureCliCredential::new());
        self.process_with_credential(credential, instruction, document, out)
            .await
    }

    /// Run against Azure with the given credential, released before returning.
    pub async fn process_with_credential<W: Write>(
        &self,
        credential: Arc<dyn TokenCredential>,
        instruction: &str,
        document: &ExpenseDocument,
        out: &mut W,
    ) -> RunOutcome {
        let Some(instruction) = non_blank(instruction) else {
            return RunOutcome::Skipped;
        };

        let scope = ScopedCredential::new(credential);
        let result = match AzureAiChatClient::from_config(&self.config, scope.handle()) {
            Ok(client) => self.run(Box::new(client), instruction, document).await,
            Err(e) => Err(e),
        };
        drop(scope);

        report(result, out)
    }

    /// Run against an already-built client.
    pub async fn process_with_client<W: Write>(
        &self,
        client: Box<dyn ModelProvider>,
        instruction: &str,
        document: &ExpenseDocument,
        out: &mut W,
    ) -> RunOutcome {
        let Some(instruction) = non_blank(instruction) else {
            return RunOutcome::Skipped;
        };
        let result = self.run(client, instruction, document).await;
        report(result, out)
    }

    async fn run(
        &self,
        client: Box<dyn ModelProvider>,
        instruction: &str,
        document: &ExpenseDocument,
    ) -> Result<AgentResponse, AgentError> {
        let agent = expenses_agent(client, Arc::clone(&self.sender));
        agent.run(build_prompt(instruction, document)).await
    }
}

fn non_blank(instruction: &str) -> Option<&str> {
    Some(instruction.trim()).filter(|s| !s.is_empty())
}

fn report<W: Write>(result: Result<AgentResponse, AgentError>, out: &mut W) -> RunOutcome {
    match result {
        Ok(response) => {
            emit(out, &format!("\n# Agent:\n{response}"));
            RunOutcome::Completed(response)
        }
        Err(e) => {
            warn!(category = %e.category(), error = %e, "agent run failed");
            let message = e.to_string();
            emit(out, &message);
            RunOutcome::Failed(message)
        }
    }
}

fn emit<W: Write>(out: &mut W, text: &str) {
    if let Err(e) = writeln!(out, "{text}").and_then(|_| out.flush()) {
        warn!(error = %e, "failed to write output");
    }
}
