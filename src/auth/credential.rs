//! Token credential trait and the scope guard that releases it.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use super::error::AuthError;
use super::token::AccessToken;

/// Source of bearer tokens for a given scope.
#[async_trait]
pub trait TokenCredential: Send + Sync {
    async fn get_token(&self, scope: &str) -> Result<AccessToken, AuthError>;

    /// Dispose of any cached token. Further `get_token` calls may fail.
    fn close(&self);
}

/// Hands out one pre-issued token until closed.
pub struct StaticTokenCredential {
    token: Mutex<Option<AccessToken>>,
}

impl StaticTokenCredential {
    pub fn new(token: AccessToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.token.lock().map(|t| t.is_none()).unwrap_or(true)
    }
}

#[async_trait]
impl TokenCredential for StaticTokenCredential {
    async fn get_token(&self, _scope: &str) -> Result<AccessToken, AuthError> {
        self.token
            .lock()
            .ok()
            .and_then(|t| t.clone())
            .ok_or(AuthError::Closed)
    }

    fn close(&self) {
        if let Ok(mut token) = self.token.lock() {
            token.take();
        }
    }
}

/// Owns a credential for one unit of work and closes it when dropped,
/// whichever way the scope is left.
pub struct ScopedCredential {
    inner: Arc<dyn TokenCredential>,
}

impl ScopedCredential {
    pub fn new(inner: Arc<dyn TokenCredential>) -> Self {
        Self { inner }
    }

    /// Shared handle for clients that live inside the scope.
    pub fn handle(&self) -> Arc<dyn TokenCredential> {
        Arc::clone(&self.inner)
    }
}

impl Drop for ScopedCredential {
    fn drop(&mut self) {
        debug!("releasing credential");
        self.inner.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn static_credential() -> Arc<StaticTokenCredential> {
        Arc::new(StaticTokenCredential::new(AccessToken::new(
            "token",
            Utc::now() + Duration::hours(1),
        )))
    }

    #[tokio::test]
    async fn static_credential_fails_after_close() {
        let credential = static_credential();
        assert_eq!(credential.get_token("scope").await.unwrap().token, "token");

        credential.close();

        assert!(matches!(credential.get_token("scope").await, Err(AuthError::Closed)));
    }

    #[test]
    fn guard_closes_on_drop() {
        let credential = static_credential();
        {
            let _scope = ScopedCredential::new(credential.clone());
            assert!(!credential.is_closed());
        }
        assert!(credential.is_closed());
    }

    #[test]
    fn guard_closes_when_unwinding() {
        let credential = static_credential();
        let inner = credential.clone();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _scope = ScopedCredential::new(inner);
            panic!("boom");
        }));

        assert!(result.is_err());
        assert!(credential.is_closed());
    }
}
