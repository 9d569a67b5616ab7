//! Token acquisition through the Azure CLI (`az account get-access-token`).

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use super::credential::TokenCredential;
use super::error::AuthError;
use super::token::AccessToken;

#[cfg(windows)]
const DEFAULT_PROGRAM: &str = "az.cmd";
#[cfg(not(windows))]
const DEFAULT_PROGRAM: &str = "az";

/// Tokens closer than this to expiry are refreshed.
const REFRESH_MARGIN_MINUTES: i64 = 5;

/// Uses the signed-in Azure CLI account. Tokens are cached per scope until
/// shortly before they expire.
pub struct AzureCliCredential {
    program: String,
    cache: Mutex<Option<(String, AccessToken)>>,
}

impl Default for AzureCliCredential {
    fn default() -> Self {
        Self::new()
    }
}

impl AzureCliCredential {
    pub fn new() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            cache: Mutex::new(None),
        }
    }

    /// Use a different executable instead of `az`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn cached(&self, scope: &str) -> Option<AccessToken> {
        let cache = self.cache.lock().ok()?;
        let (cached_scope, token) = cache.as_ref()?;
        let margin = Duration::minutes(REFRESH_MARGIN_MINUTES);
        (cached_scope == scope && token.is_fresh_at(Utc::now(), margin)).then(|| token.clone())
    }

    async fn fetch(&self, scope: &str) -> Result<AccessToken, AuthError> {
        debug!(program = %self.program, scope, "requesting token from Azure CLI");
        let output = Command::new(&self.program)
            .args(["account", "get-access-token", "--output", "json", "--scope", scope])
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    AuthError::CliUnavailable(format!("'{}' not found on PATH", self.program))
                }
                _ => AuthError::Io(e.to_string()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(classify_cli_failure(stderr));
        }

        parse_cli_token(&String::from_utf8_lossy(&output.stdout))
    }
}

#[async_trait]
impl TokenCredential for AzureCliCredential {
    async fn get_token(&self, scope: &str) -> Result<AccessToken, AuthError> {
        if let Some(token) = self.cached(scope) {
            return Ok(token);
        }
        let token = self.fetch(scope).await?;
        if let Ok(mut cache) = self.cache.lock() {
            *cache = Some((scope.to_string(), token.clone()));
        }
        Ok(token)
    }

    fn close(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.take();
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliTokenOutput {
    access_token: String,
    /// Local time, e.g. "2024-05-01 13:45:10.000000". Older CLI versions only.
    expires_on: Option<String>,
    /// Unix seconds. Present on CLI 2.54 and later.
    #[serde(rename = "expires_on")]
    expires_on_epoch: Option<i64>,
}

/// Parse the JSON printed by `az account get-access-token`.
pub fn parse_cli_token(stdout: &str) -> Result<AccessToken, AuthError> {
    let raw: CliTokenOutput = serde_json::from_str(stdout.trim())?;
    if raw.access_token.is_empty() {
        return Err(AuthError::InvalidResponse("empty accessToken".into()));
    }

    let expires_at = match (raw.expires_on_epoch, raw.expires_on.as_deref()) {
        (Some(epoch), _) => DateTime::<Utc>::from_timestamp(epoch, 0)
            .ok_or_else(|| AuthError::InvalidResponse(format!("bad expires_on: {epoch}")))?,
        (None, Some(local)) => parse_local_timestamp(local)?,
        (None, None) => {
            return Err(AuthError::InvalidResponse("missing token expiry".into()));
        }
    };

    Ok(AccessToken::new(raw.access_token, expires_at))
}

fn parse_local_timestamp(value: &str) -> Result<DateTime<Utc>, AuthError> {
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .map_err(|e| AuthError::InvalidResponse(format!("bad expiresOn '{value}': {e}")))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AuthError::InvalidResponse(format!("ambiguous expiresOn '{value}'")))
}

fn classify_cli_failure(stderr: String) -> AuthError {
    if stderr.contains("az login") {
        AuthError::NotLoggedIn(stderr)
    } else {
        AuthError::CommandFailed(stderr)
    }
}
