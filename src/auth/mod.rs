//! Credentials for the remote agent service.

pub mod azure_cli;
pub mod credential;
pub mod error;
pub mod token;

pub use azure_cli::AzureCliCredential;
pub use credential::{ScopedCredential, StaticTokenCredential, TokenCredential};
pub use error::AuthError;
pub use token::AccessToken;
