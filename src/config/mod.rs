//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `FACILITY_CONCIERGE_` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use facility_concierge::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! config.logging.init().expect("Failed to install logging");
//! ```

mod cards;
mod classifier;
mod engine;
mod error;
mod logging;
mod storage;

pub use cards::CardsConfig;
pub use classifier::{ClassifierConfig, ClassifierProvider};
pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// offline setup: keyword classifier, in-memory sessions, embedded cards.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Intent classifier (LUIS or keyword rules)
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Session store (memory, file or redis)
    #[serde(default)]
    pub storage: StorageConfig,

    /// Card template source
    #[serde(default)]
    pub cards: CardsConfig,

    /// Turn processing limits
    #[serde(default)]
    pub engine: EngineConfig,

    /// Tracing subscriber
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `FACILITY_CONCIERGE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `FACILITY_CONCIERGE__CLASSIFIER__PROVIDER=luis` -> `classifier.provider = luis`
    /// - `FACILITY_CONCIERGE__STORAGE__REDIS_URL=...` -> `storage.redis_url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("FACILITY_CONCIERGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first section that is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.classifier.validate()?;
        self.storage.validate()?;
        self.engine.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
