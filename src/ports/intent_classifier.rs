//! Intent Classifier Port - Interface for intent and entity recognition.
//!
//! The orchestrator classifies free text only when no dialog is active.
//! Adapters translate a provider's prediction into an `IntentResult`.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct AlwaysBook;
//!
//! #[async_trait]
//! impl IntentClassifier for AlwaysBook {
//!     async fn classify(&self, _text: &str) -> Result<IntentResult, ClassifierError> {
//!         Ok(IntentResult::new(Intent::BookFacilities))
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::domain::conversation::IntentResult;

/// Port for classifying user text into an intent plus entities.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Classify one utterance.
    ///
    /// # Errors
    /// Returns `ClassifierError` when the provider cannot be reached or its
    /// response cannot be interpreted. Callers degrade to `Intent::None`.
    async fn classify(&self, text: &str) -> Result<IntentResult, ClassifierError>;
}

/// Errors from classifier providers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifierError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Request timed out")]
    Timeout,

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl ClassifierError {
    /// Returns true if a later attempt might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::RateLimited | Self::Timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors_are_retryable() {
        assert!(ClassifierError::Timeout.is_retryable());
        assert!(ClassifierError::RateLimited.is_retryable());
        assert!(ClassifierError::Network("reset".into()).is_retryable());
    }

    #[test]
    fn permanent_errors_are_not_retryable() {
        assert!(!ClassifierError::AuthenticationFailed("bad key".into()).is_retryable());
        assert!(!ClassifierError::Parse("eof".into()).is_retryable());
    }
}
