//! Driving a provider through tool calls to a final answer.

pub mod text;

pub use text::{generate_text, MAX_TOOL_ITERATIONS};
