//! Session providers
//!
//! The management API wants a session id on every command. How that id is
//! obtained is up to the caller; the provider only asks for one before each
//! request.

use async_trait::async_trait;
use hedvig_common::{Error, Result};

/// Source of management API session ids
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn session_id(&self) -> Result<String>;
}

/// A fixed, externally obtained session id
#[derive(Clone)]
pub struct StaticSession {
    session_id: String,
}

impl StaticSession {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }
}

impl std::fmt::Debug for StaticSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticSession")
            .field("session_id", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl SessionProvider for StaticSession {
    async fn session_id(&self) -> Result<String> {
        if self.session_id.is_empty() {
            return Err(Error::Session("no session id configured".to_string()));
        }
        Ok(self.session_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_session() {
        let session = StaticSession::new("abc");
        assert_eq!(session.session_id().await.unwrap(), "abc");
    }

    #[tokio::test]
    async fn test_empty_static_session_fails() {
        let err = StaticSession::new("").session_id().await.unwrap_err();
        assert!(matches!(err, Error::Session(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", StaticSession::new("hunter2"));
        assert!(!rendered.contains("hunter2"));
    }
}
