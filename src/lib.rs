//! Expense claim assistant.
//!
//! Reads a local expenses file, hands it to a chat agent hosted on Azure
//! AI Foundry together with the user's instruction, and lets the agent call
//! a simulated `send_email` tool that prints the claim instead of sending it.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use expense_agent::prelude::*;
//!
//! # async fn example() -> expense_agent::error::Result<()> {
//! let config = AgentConfig::from_env();
//! let document = DataSource::from_config(&config).load()?;
//! let orchestrator = Orchestrator::new(config, Arc::new(ConsoleEmailSender::stdout()));
//! orchestrator
//!     .process("Submit an expense claim", &document, &mut std::io::stdout())
//!     .await;
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod auth;
pub mod config;
pub mod data;
pub mod error;
pub mod generation;
pub mod orchestrator;
pub mod prelude;
pub mod provider;
pub mod tools;
pub mod types;
