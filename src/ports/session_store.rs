//! Session Store Port - Interface for persisting conversation sessions.
//!
//! The orchestrator loads a session at the start of every turn and saves it
//! once at the end. The contract is read-modify-write per key with
//! last-writer-wins; concurrent turns for one key are serialized above this
//! port.

use async_trait::async_trait;

use crate::domain::conversation::Session;
use crate::domain::foundation::ConversationKey;

/// Errors that can occur during session storage operations
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Failed to serialize session: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize session: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Port for persisting and loading sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the session for a conversation.
    ///
    /// # Returns
    /// `None` if no session was stored for the key yet
    ///
    /// # Errors
    /// Returns `SessionStoreError` if the backend fails or the stored data
    /// cannot be decoded
    async fn load(&self, key: &ConversationKey) -> Result<Option<Session>, SessionStoreError>;

    /// Save a session, replacing any stored version.
    ///
    /// # Errors
    /// Returns `SessionStoreError` if save fails
    async fn save(&self, key: &ConversationKey, session: &Session) -> Result<(), SessionStoreError>;

    /// Delete a stored session. Deleting a missing key is not an error.
    ///
    /// # Errors
    /// Returns `SessionStoreError` if the backend fails
    async fn delete(&self, key: &ConversationKey) -> Result<(), SessionStoreError>;
}
