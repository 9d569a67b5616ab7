//! Shared HTTP client and status handling.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::AgentError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Transport timeout for every request; nothing else bounds a call.
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    })
}

/// Default headers for a Bearer-token API.
pub fn bearer_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(mut val) = HeaderValue::from_str(&format!("Bearer {token}")) {
        val.set_sensitive(true);
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Map a non-success status and its body to an error.
pub fn status_to_error(status: u16, body: &str) -> AgentError {
    let message = error_message(body).unwrap_or_else(|| body.to_string());
    match status {
        401 | 403 => AgentError::Authentication(message),
        _ => AgentError::api(status, message),
    }
}

/// Azure and OpenAI both wrap failures as `{"error": {"code", "message"}}`.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;
    let message = error.get("message")?.as_str()?;
    Some(match error.get("code").and_then(|c| c.as_str()) {
        Some(code) => format!("{code}: {message}"),
        None => message.to_string(),
    })
}
