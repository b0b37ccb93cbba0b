//! Session storage configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;

/// Session storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Which store holds sessions
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for the file backend
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Connection URL for the redis backend
    pub redis_url: Option<String>,

    /// Expiry of redis entries in seconds
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,

    /// Prefix of redis keys
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

/// Session store backend
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory, lost on restart
    #[default]
    Memory,
    /// One YAML file per conversation
    File,
    /// Redis string keys
    Redis,
}

impl StorageConfig {
    /// Get redis TTL as Duration
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.backend {
            StorageBackend::Memory => Ok(()),
            StorageBackend::File => {
                if self.path.as_os_str().is_empty() {
                    return Err(ValidationError::MissingRequired("STORAGE__PATH"));
                }
                Ok(())
            }
            StorageBackend::Redis => {
                let url = match self.redis_url.as_deref() {
                    Some(url) if !url.is_empty() => url,
                    _ => return Err(ValidationError::MissingRequired("STORAGE__REDIS_URL")),
                };
                if !url.starts_with("redis://") && !url.starts_with("rediss://") {
                    return Err(ValidationError::InvalidRedisUrl);
                }
                if self.ttl_secs == 0 {
                    return Err(ValidationError::InvalidTimeout("storage ttl"));
                }
                Ok(())
            }
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_path(),
            redis_url: None,
            ttl_secs: default_ttl(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_path() -> PathBuf {
    PathBuf::from("./data/sessions")
}

fn default_ttl() -> u64 {
    86_400
}

fn default_key_prefix() -> String {
    "facility-concierge:session".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redis(url: &str) -> StorageConfig {
        StorageConfig {
            backend: StorageBackend::Redis,
            redis_url: Some(url.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_storage_defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.backend, StorageBackend::Memory);
        assert_eq!(config.path, PathBuf::from("./data/sessions"));
        assert_eq!(config.ttl(), Duration::from_secs(86_400));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_redis_requires_url() {
        let config = StorageConfig {
            backend: StorageBackend::Redis,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("STORAGE__REDIS_URL"))
        );
    }

    #[test]
    fn test_redis_url_scheme() {
        assert_eq!(
            redis("http://localhost").validate(),
            Err(ValidationError::InvalidRedisUrl)
        );
        assert!(redis("redis://localhost:6379").validate().is_ok());
        assert!(redis("rediss://cache.example.com:6380").validate().is_ok());
    }

    #[test]
    fn test_redis_zero_ttl_is_rejected() {
        let config = StorageConfig {
            ttl_secs: 0,
            ..redis("redis://localhost")
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_requires_path() {
        let config = StorageConfig {
            backend: StorageBackend::File,
            path: PathBuf::new(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("STORAGE__PATH"))
        );
    }
}
