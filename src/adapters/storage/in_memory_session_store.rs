//! In-Memory Session Store Adapter
//!
//! Keeps sessions in a process-local map. Useful for testing and for
//! single-instance deployments that accept losing state on restart.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::Session;
use crate::domain::foundation::ConversationKey;
use crate::ports::{SessionStore, SessionStoreError};

/// In-memory storage for sessions
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<ConversationKey, Session>>>,
}

impl InMemorySessionStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored sessions (useful for tests)
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }

    /// Get the number of stored sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, key: &ConversationKey) -> Result<Option<Session>, SessionStoreError> {
        Ok(self.sessions.read().await.get(key).cloned())
    }

    async fn save(&self, key: &ConversationKey, session: &Session) -> Result<(), SessionStoreError> {
        self.sessions
            .write()
            .await
            .insert(key.clone(), session.clone());
        Ok(())
    }

    async fn delete(&self, key: &ConversationKey) -> Result<(), SessionStoreError> {
        self.sessions.write().await.remove(key);
        Ok(())
    }
}
