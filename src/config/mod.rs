//! Configuration (layered: code > env > `.env` file).

use std::path::PathBuf;

use crate::error::AgentError;

pub const ENDPOINT_VAR: &str = "PROJECT_ENDPOINT";
pub const DEPLOYMENT_VAR: &str = "AZURE_AI_MODEL_DEPLOYMENT_NAME";
pub const API_VERSION_VAR: &str = "AZURE_OPENAI_API_VERSION";
pub const TOKEN_SCOPE_VAR: &str = "AZURE_TOKEN_SCOPE";
pub const DATA_DIR_VAR: &str = "EXPENSES_DATA_DIR";
pub const DATA_FILES_VAR: &str = "EXPENSES_DATA_FILES";

pub const DEFAULT_API_VERSION: &str = "2024-10-21";
pub const DEFAULT_TOKEN_SCOPE: &str = "https://cognitiveservices.azure.com/.default";

/// Accepted data file names, in priority order.
pub const DEFAULT_DATA_FILES: [&str; 3] = ["expenses.csv", "data.txt", "expenses.txt"];

/// Process-wide settings, loaded once at start-up and passed down explicitly.
///
/// `endpoint` and `deployment` stay optional here; their absence only
/// surfaces when the chat client is built (see [`AgentConfig::require_endpoint`]).
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub endpoint: Option<String>,
    pub deployment: Option<String>,
    pub api_version: String,
    pub token_scope: String,
    pub data_dir: PathBuf,
    pub data_files: Vec<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            deployment: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            token_scope: DEFAULT_TOKEN_SCOPE.to_string(),
            data_dir: PathBuf::from("."),
            data_files: DEFAULT_DATA_FILES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AgentConfig {
    /// Load `.env` (if present) and read settings from the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self {
            endpoint: get(ENDPOINT_VAR),
            deployment: get(DEPLOYMENT_VAR),
            ..Self::default()
        };

        if let Some(version) = get(API_VERSION_VAR) {
            config.api_version = version;
        }
        if let Some(scope) = get(TOKEN_SCOPE_VAR) {
            config.token_scope = scope;
        }
        if let Some(dir) = get(DATA_DIR_VAR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(files) = get(DATA_FILES_VAR) {
            let parsed = parse_file_list(&files);
            if !parsed.is_empty() {
                config.data_files = parsed;
            }
        }

        config
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = Some(deployment.into());
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn require_endpoint(&self) -> Result<&str, AgentError> {
        self.endpoint
            .as_deref()
            .ok_or_else(|| AgentError::Configuration(format!("Missing {ENDPOINT_VAR}")))
    }

    pub fn require_deployment(&self) -> Result<&str, AgentError> {
        self.deployment
            .as_deref()
            .ok_or_else(|| AgentError::Configuration(format!("Missing {DEPLOYMENT_VAR}")))
    }
}

fn parse_file_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = AgentConfig::from_lookup(|_| None);

        assert_eq!(config, AgentConfig::default());
        assert_eq!(
            config.data_files,
            vec!["expenses.csv", "data.txt", "expenses.txt"]
        );
    }

    #[test]
    fn reads_endpoint_and_deployment() {
        let config = AgentConfig::from_lookup(lookup(&[
            (ENDPOINT_VAR, "https://res.services.ai.azure.com/api/projects/lab"),
            (DEPLOYMENT_VAR, "gpt-4o"),
        ]));

        assert_eq!(
            config.require_endpoint().unwrap(),
            "https://res.services.ai.azure.com/api/projects/lab"
        );
        assert_eq!(config.require_deployment().unwrap(), "gpt-4o");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = AgentConfig::from_lookup(lookup(&[(ENDPOINT_VAR, "   ")]));

        let err = config.require_endpoint().unwrap_err();
        assert!(err.to_string().contains(ENDPOINT_VAR));
    }

    #[test]
    fn missing_deployment_names_the_variable() {
        let config = AgentConfig::default().with_endpoint("https://example.test");

        let err = config.require_deployment().unwrap_err();
        assert!(matches!(err, AgentError::Configuration(ref msg) if msg.contains(DEPLOYMENT_VAR)));
    }

    #[test]
    fn data_file_list_keeps_order_and_skips_blanks() {
        let config = AgentConfig::from_lookup(lookup(&[
            (DATA_FILES_VAR, " claims.csv, ,notes.txt "),
            (DATA_DIR_VAR, "/srv/expenses"),
        ]));

        assert_eq!(config.data_files, vec!["claims.csv", "notes.txt"]);
        assert_eq!(config.data_dir, PathBuf::from("/srv/expenses"));
    }

    #[test]
    fn overrides_api_version_and_scope() {
        let config = AgentConfig::from_lookup(lookup(&[
            (API_VERSION_VAR, "2025-01-01-preview"),
            (TOKEN_SCOPE_VAR, "https://ai.azure.com/.default"),
        ]));

        assert_eq!(config.api_version, "2025-01-01-preview");
        assert_eq!(config.token_scope, "https://ai.azure.com/.default");
    }
}
