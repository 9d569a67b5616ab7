//! Single-turn chat agent bound to a client and a set of tools.

pub mod agent;

pub use agent::{AgentResponse, ChatAgent};
