//! File-based Session Store Adapter
//!
//! Stores each session as a YAML file on disk, one file per conversation
//! key. Handy for local development because sessions stay human-readable.

use async_trait::async_trait;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::conversation::Session;
use crate::domain::foundation::ConversationKey;
use crate::ports::{SessionStore, SessionStoreError};

/// File-based storage for sessions
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    base_path: PathBuf,
}

impl FileSessionStore {
    /// Create a new file store with a base directory
    ///
    /// # Example
    /// ```ignore
    /// let store = FileSessionStore::new("./data/sessions");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the session file path for a key
    fn session_file_path(&self, key: &ConversationKey) -> PathBuf {
        self.base_path.join(format!("{}.yaml", file_stem(key)))
    }

    /// Ensure the base directory exists
    async fn ensure_dir(&self) -> Result<(), SessionStoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| SessionStoreError::IoError(e.to_string()))
    }
}

/// Encodes a key as a file stem. ASCII letters, digits and `-` pass through;
/// every other byte becomes `_xx`, so distinct keys never share a file.
fn file_stem(key: &ConversationKey) -> String {
    let mut stem = String::with_capacity(key.as_str().len());
    for byte in key.as_str().bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(byte as char);
        } else {
            let _ = write!(stem, "_{:02x}", byte);
        }
    }
    stem
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self, key: &ConversationKey) -> Result<Option<Session>, SessionStoreError> {
        let file_path = self.session_file_path(key);

        let yaml = match fs::read_to_string(&file_path).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionStoreError::IoError(e.to_string())),
        };

        let session = serde_yaml::from_str(&yaml)
            .map_err(|e| SessionStoreError::DeserializationFailed(e.to_string()))?;

        Ok(Some(session))
    }

    async fn save(&self, key: &ConversationKey, session: &Session) -> Result<(), SessionStoreError> {
        self.ensure_dir().await?;

        let yaml = serde_yaml::to_string(session)
            .map_err(|e| SessionStoreError::SerializationFailed(e.to_string()))?;

        // Write beside the target and rename so readers never see a partial file
        let file_path = self.session_file_path(key);
        let tmp_path = file_path.with_extension("yaml.tmp");
        fs::write(&tmp_path, yaml)
            .await
            .map_err(|e| SessionStoreError::IoError(e.to_string()))?;
        fs::rename(&tmp_path, &file_path)
            .await
            .map_err(|e| SessionStoreError::IoError(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, key: &ConversationKey) -> Result<(), SessionStoreError> {
        match fs::remove_file(self.session_file_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionStoreError::IoError(e.to_string())),
        }
    }
}
