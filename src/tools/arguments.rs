//! Typed access to tool call arguments.

use crate::error::AgentError;

/// Arguments the model supplied for one tool call.
///
/// Models occasionally send the arguments as a JSON-encoded string instead of
/// an object; [`ToolArguments::new`] unwraps that form so accessors see an object.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        let value = match value {
            serde_json::Value::String(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    serde_json::json!({})
                } else {
                    serde_json::from_str(trimmed).unwrap_or(serde_json::Value::String(raw))
                }
            }
            other => other,
        };
        Self { value }
    }

    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str, AgentError> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| AgentError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(|v| v.as_str())
    }

    /// Deserialize the whole argument object into a typed struct.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, AgentError> {
        serde_json::from_value(self.value.clone()).map_err(|e| {
            AgentError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
        })
    }
}
