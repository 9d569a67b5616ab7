//! Results of a tool-loop run.

use super::generation::FinishReason;
use super::message::{AgentToolCall, AgentToolResult, ModelMessage};
use super::usage::Usage;

/// Result of a text generation call, possibly spanning several model calls.
#[derive(Debug, Clone)]
pub struct GenerateTextResult {
    /// Final generated text.
    pub text: String,
    /// One entry per model call.
    pub steps: Vec<GenerationStep>,
    /// Transcript sent to and received from the model, tool turns included.
    pub messages: Vec<ModelMessage>,
    /// Aggregated usage across all steps.
    pub usage: Usage,
    /// Why the final step finished.
    pub finish_reason: Option<FinishReason>,
}

/// A single generation step (one model call).
#[derive(Debug, Clone)]
pub struct GenerationStep {
    pub text: String,
    /// Tool calls made in this step, if any.
    pub tool_calls: Vec<AgentToolCall>,
    /// Tool results returned in this step, if any.
    pub tool_results: Vec<AgentToolResult>,
    pub usage: Usage,
    pub finish_reason: Option<FinishReason>,
}

impl GenerateTextResult {
    /// Every tool call made across all steps, in order.
    pub fn tool_calls(&self) -> impl Iterator<Item = &AgentToolCall> {
        self.steps.iter().flat_map(|step| step.tool_calls.iter())
    }

    /// Every tool result produced across all steps, in order.
    pub fn tool_results(&self) -> impl Iterator<Item = &AgentToolResult> {
        self.steps.iter().flat_map(|step| step.tool_results.iter())
    }

    /// True when the loop stopped on the iteration bound rather than a final answer.
    pub fn hit_step_limit(&self) -> bool {
        self.finish_reason == Some(FinishReason::Length)
            && self.steps.last().is_some_and(|s| !s.tool_calls.is_empty())
    }
}
