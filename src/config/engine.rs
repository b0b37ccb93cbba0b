//! Conversation engine configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Conversation engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Upper bound on a single turn in seconds
    #[serde(default = "default_turn_timeout")]
    pub turn_timeout_secs: u64,
}

impl EngineConfig {
    /// Get turn timeout as Duration
    pub fn turn_timeout(&self) -> Duration {
        Duration::from_secs(self.turn_timeout_secs)
    }

    /// Validate engine configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.turn_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("turn"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            turn_timeout_secs: default_turn_timeout(),
        }
    }
}

fn default_turn_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.turn_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_turn_timeout_is_rejected() {
        let config = EngineConfig {
            turn_timeout_secs: 0,
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout("turn")));
    }
}
