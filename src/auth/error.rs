use thiserror::Error;

use crate::error::AgentError;

/// Failures while acquiring a token.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not logged in: {0}. Run `az login` first")]
    NotLoggedIn(String),
    #[error("Azure CLI unavailable: {0}")]
    CliUnavailable(String),
    #[error("Azure CLI failed: {0}")]
    CommandFailed(String),
    #[error("Invalid token response: {0}")]
    InvalidResponse(String),
    #[error("Credential closed")]
    Closed,
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<AuthError> for AgentError {
    fn from(error: AuthError) -> Self {
        AgentError::Authentication(error.to_string())
    }
}
