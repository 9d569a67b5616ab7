//! Simulated email capability exposed to the agent.
//!
//! Nothing here touches the network: [`ConsoleEmailSender`] prints the
//! message. Swapping in a real transport means implementing [`EmailSender`].

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::arguments::ToolArguments;
use super::tool::{Tool, ToolExecutionContext};
use super::types::AgentToolParameters;
use crate::error::AgentError;

pub const SEND_EMAIL_TOOL: &str = "send_email";

/// One email as requested by the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Something that can deliver an [`EmailMessage`].
pub trait EmailSender: Send + Sync {
    fn send_email(&self, message: &EmailMessage) -> Result<(), AgentError>;
}

/// Prints emails to a writer instead of sending them.
pub struct ConsoleEmailSender<W> {
    out: Mutex<W>,
}

impl ConsoleEmailSender<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleEmailSender<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }
}

impl<W: Write + Send> EmailSender for ConsoleEmailSender<W> {
    fn send_email(&self, message: &EmailMessage) -> Result<(), AgentError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| AgentError::ToolExecution {
                tool_name: SEND_EMAIL_TOOL.to_string(),
                message: "email output lock poisoned".to_string(),
            })?;
        write!(
            out,
            "\nTo: {}\nSubject: {}\n{}\n\n",
            message.to, message.subject, message.body
        )?;
        out.flush()?;
        Ok(())
    }
}

/// Adapts an [`EmailSender`] to the [`Tool`] interface the agent calls.
pub struct SendEmailTool {
    sender: Arc<dyn EmailSender>,
    parameters: AgentToolParameters,
}

impl SendEmailTool {
    pub fn new(sender: Arc<dyn EmailSender>) -> Self {
        let parameters = AgentToolParameters::object()
            .string("to", "Who to send the email to", true)
            .string("subject", "The subject of the email.", true)
            .string("body", "The text body of the email.", true)
            .build();
        Self { sender, parameters }
    }
}

#[async_trait]
impl Tool for SendEmailTool {
    fn name(&self) -> &str {
        SEND_EMAIL_TOOL
    }

    fn description(&self) -> &str {
        "Send an email to a recipient with a subject and a text body."
    }

    fn parameters(&self) -> &AgentToolParameters {
        &self.parameters
    }

    async fn execute(
        &self,
        args: &ToolArguments,
        ctx: &ToolExecutionContext,
    ) -> Result<serde_json::Value, AgentError> {
        let message: EmailMessage = args.deserialize()?;
        debug!(run_id = ?ctx.run_id, to = %message.to, "sending simulated email");
        self.sender.send_email(&message)?;
        Ok(serde_json::json!({ "status": "sent", "to": message.to }))
    }
}
