//! Convenience re-exports for common use.

pub use crate::agent::{AgentResponse, ChatAgent};
pub use crate::auth::{AzureCliCredential, ScopedCredential, TokenCredential};
pub use crate::config::AgentConfig;
pub use crate::data::{DataSource, ExpenseDocument};
pub use crate::error::{AgentError, Result};
pub use crate::orchestrator::{Orchestrator, RunOutcome};
pub use crate::provider::{AzureAiChatClient, ModelProvider};
pub use crate::tools::{ConsoleEmailSender, EmailMessage, EmailSender, Tool};
pub use crate::types::{GenerationSettings, ModelMessage, Role};
