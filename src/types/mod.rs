//! Core types shared by the provider, tool loop and agent.

pub mod generation;
pub mod message;
pub mod results;
pub mod usage;

pub use generation::*;
pub use message::*;
pub use results::*;
pub use usage::*;
