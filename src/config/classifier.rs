//! Intent classifier configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Intent classifier configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Which classifier to use
    #[serde(default)]
    pub provider: ClassifierProvider,

    /// LUIS application id
    pub app_id: Option<String>,

    /// LUIS subscription key
    pub api_key: Option<Secret<String>>,

    /// LUIS endpoint host
    #[serde(default = "default_host")]
    pub host: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Classifier backend
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierProvider {
    /// LUIS v2 prediction endpoint
    Luis,
    /// Offline keyword rules
    #[default]
    Keyword,
}

impl ClassifierConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if LUIS credentials are present
    pub fn has_luis_credentials(&self) -> bool {
        self.app_id.as_ref().is_some_and(|id| !id.is_empty())
            && self
                .api_key
                .as_ref()
                .is_some_and(|key| !key.expose_secret().is_empty())
    }

    /// Validate classifier configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.provider == ClassifierProvider::Luis {
            if !self.app_id.as_ref().is_some_and(|id| !id.is_empty()) {
                return Err(ValidationError::MissingRequired("CLASSIFIER__APP_ID"));
            }
            if !self.has_luis_credentials() {
                return Err(ValidationError::MissingRequired("CLASSIFIER__API_KEY"));
            }
            if self.host.is_empty() {
                return Err(ValidationError::MissingRequired("CLASSIFIER__HOST"));
            }
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("classifier"));
        }
        Ok(())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            provider: ClassifierProvider::default(),
            app_id: None,
            api_key: None,
            host: default_host(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_host() -> String {
    "westus.api.cognitive.microsoft.com".to_string()
}

fn default_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn luis() -> ClassifierConfig {
        ClassifierConfig {
            provider: ClassifierProvider::Luis,
            app_id: Some("app-1".to_string()),
            api_key: Some(Secret::new("key".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_classifier_defaults() {
        let config = ClassifierConfig::default();
        assert_eq!(config.provider, ClassifierProvider::Keyword);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_luis_requires_app_id() {
        let config = ClassifierConfig {
            app_id: None,
            ..luis()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("CLASSIFIER__APP_ID"))
        );
    }

    #[test]
    fn test_luis_requires_api_key() {
        let config = ClassifierConfig {
            api_key: Some(Secret::new(String::new())),
            ..luis()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("CLASSIFIER__API_KEY"))
        );
    }

    #[test]
    fn test_luis_with_credentials_is_valid() {
        assert!(luis().validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = ClassifierConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_is_redacted_in_debug() {
        let rendered = format!("{:?}", luis());
        assert!(!rendered.contains("\"key\""));
    }
}
