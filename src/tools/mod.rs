//! Tool system for function calling.

pub mod arguments;
pub mod email;
pub mod tool;
pub mod types;
pub mod validation;

pub use arguments::ToolArguments;
pub use email::{ConsoleEmailSender, EmailMessage, EmailSender, SendEmailTool};
pub use tool::{AgentTool, Tool, ToolExecutionContext};
pub use types::AgentToolParameters;
