//! Extension session storage
//!
//! Sessions are issued by the commerce platform's launch handshake and looked
//! up by id on every catalog call.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::RwLock;

use storia_core::models::ExtensionSession;
use storia_core::AppError;

#[async_trait]
pub trait SessionStore: Send + Sync + Debug {
    async fn get(&self, session_id: &str) -> anyhow::Result<Option<ExtensionSession>>;

    async fn put(&self, session: ExtensionSession) -> anyhow::Result<()>;

    /// Returns whether a session was removed
    async fn remove(&self, session_id: &str) -> anyhow::Result<bool>;
}

/// Process-local session store.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, ExtensionSession>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session_id: &str) -> anyhow::Result<Option<ExtensionSession>> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn put(&self, session: ExtensionSession) -> anyhow::Result<()> {
        self.sessions
            .write()
            .await
            .insert(session.session_id.clone(), session);
        Ok(())
    }

    async fn remove(&self, session_id: &str) -> anyhow::Result<bool> {
        Ok(self.sessions.write().await.remove(session_id).is_some())
    }
}

/// Resolve a live session or fail with `Unauthorized`.
pub async fn require_session(
    store: &dyn SessionStore,
    session_id: Option<&str>,
) -> Result<ExtensionSession, AppError> {
    let session_id = session_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Extension session required".to_string()))?;

    let session = store
        .get(session_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unknown extension session".to_string()))?;

    if session.is_expired(Utc::now()) {
        store.remove(session_id).await?;
        return Err(AppError::Unauthorized(
            "Extension session expired".to_string(),
        ));
    }

    Ok(session)
}
