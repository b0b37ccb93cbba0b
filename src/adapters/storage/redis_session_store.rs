//! Redis-backed session store for multi-instance deployments.
//!
//! Sessions are stored as JSON strings under `{prefix}:{conversation key}`.
//! When a TTL is configured every save refreshes it, so idle conversations
//! expire on their own.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

use crate::domain::conversation::Session;
use crate::domain::foundation::ConversationKey;
use crate::ports::{SessionStore, SessionStoreError};

/// Redis-backed session store.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
    key_prefix: String,
    ttl: Option<Duration>,
}

impl RedisSessionStore {
    /// Create a store over an established connection.
    pub fn new(conn: MultiplexedConnection, key_prefix: impl Into<String>) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
            ttl: None,
        }
    }

    /// Connect to `url` and create a store.
    ///
    /// # Errors
    /// Returns `SessionStoreError::Backend` if the URL is invalid or the
    /// server cannot be reached.
    pub async fn connect(url: &str, key_prefix: impl Into<String>) -> Result<Self, SessionStoreError> {
        let client = redis::Client::open(url).map_err(backend_error)?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(backend_error)?;
        Ok(Self::new(conn, key_prefix))
    }

    /// Expire sessions after `ttl` without a save.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl).filter(|ttl| ttl.as_secs() > 0);
        self
    }

    fn redis_key(&self, key: &ConversationKey) -> String {
        redis_key(&self.key_prefix, key)
    }
}

fn redis_key(prefix: &str, key: &ConversationKey) -> String {
    format!("{}:{}", prefix, key)
}

fn backend_error(e: redis::RedisError) -> SessionStoreError {
    SessionStoreError::Backend(e.to_string())
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, key: &ConversationKey) -> Result<Option<Session>, SessionStoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(self.redis_key(key)).await.map_err(backend_error)?;

        raw.map(|json| {
            serde_json::from_str(&json)
                .map_err(|e| SessionStoreError::DeserializationFailed(e.to_string()))
        })
        .transpose()
    }

    async fn save(&self, key: &ConversationKey, session: &Session) -> Result<(), SessionStoreError> {
        let json = serde_json::to_string(session)
            .map_err(|e| SessionStoreError::SerializationFailed(e.to_string()))?;

        let mut cmd = redis::cmd("SET");
        cmd.arg(self.redis_key(key)).arg(json);
        if let Some(ttl) = self.ttl {
            cmd.arg("EX").arg(ttl.as_secs());
        }

        let mut conn = self.conn.clone();
        cmd.query_async::<_, ()>(&mut conn)
            .await
            .map_err(backend_error)
    }

    async fn delete(&self, key: &ConversationKey) -> Result<(), SessionStoreError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(self.redis_key(key))
            .await
            .map_err(backend_error)
    }
}
