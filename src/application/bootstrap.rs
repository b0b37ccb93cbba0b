//! Composition root.
//!
//! Turns a validated `AppConfig` into a ready `TurnHandler` by choosing the
//! adapter behind every port.

use std::sync::Arc;

use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::info;

use crate::adapters::{
    AdaptiveCardRenderer, FileSessionStore, InMemorySessionStore, KeywordIntentClassifier,
    LuisConfig, LuisIntentClassifier, RedisSessionStore,
};
use crate::config::{
    AppConfig, CardsConfig, ClassifierConfig, ClassifierProvider, StorageBackend, StorageConfig,
    ValidationError,
};
use crate::domain::validation::StaticDirectory;
use crate::ports::{
    CardRenderer, ClassifierError, IntentClassifier, RenderError, SessionStore, SessionStoreError,
};

use super::flows::facility_engine;
use super::handlers::TurnHandler;

/// Errors raised while wiring adapters.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("Classifier setup failed: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Session store setup failed: {0}")]
    Storage(#[from] SessionStoreError),

    #[error("Card templates could not be loaded: {0}")]
    Cards(#[from] RenderError),
}

/// Builds the turn handler described by `config`.
///
/// # Errors
/// Returns `BootstrapError` if the configuration is invalid or an adapter
/// cannot be created.
pub async fn build_turn_handler(config: &AppConfig) -> Result<TurnHandler, BootstrapError> {
    config.validate()?;

    let classifier = build_classifier(&config.classifier)?;
    let store = build_store(&config.storage).await?;
    let renderer = build_renderer(&config.cards).await?;
    let engine = facility_engine(Arc::new(StaticDirectory::new()), Arc::clone(&renderer));

    info!(
        classifier = ?config.classifier.provider,
        storage = ?config.storage.backend,
        turn_timeout_secs = config.engine.turn_timeout_secs,
        "Turn handler ready"
    );

    Ok(
        TurnHandler::new(Arc::new(engine), classifier, store, renderer)
            .with_turn_timeout(config.engine.turn_timeout()),
    )
}

fn build_classifier(
    config: &ClassifierConfig,
) -> Result<Arc<dyn IntentClassifier>, BootstrapError> {
    match config.provider {
        ClassifierProvider::Keyword => Ok(Arc::new(KeywordIntentClassifier::new())),
        ClassifierProvider::Luis => {
            let (Some(app_id), Some(api_key)) = (&config.app_id, &config.api_key) else {
                return Err(ValidationError::MissingRequired("CLASSIFIER__API_KEY").into());
            };
            let luis = LuisConfig::new(
                app_id.clone(),
                api_key.expose_secret().clone(),
                config.host.clone(),
            )
            .with_timeout(config.timeout());
            Ok(Arc::new(LuisIntentClassifier::new(luis)?))
        }
    }
}

async fn build_store(config: &StorageConfig) -> Result<Arc<dyn SessionStore>, BootstrapError> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(InMemorySessionStore::new())),
        StorageBackend::File => Ok(Arc::new(FileSessionStore::new(&config.path))),
        StorageBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .ok_or(ValidationError::MissingRequired("STORAGE__REDIS_URL"))?;
            let store = RedisSessionStore::connect(url, config.key_prefix.clone())
                .await?
                .with_ttl(config.ttl());
            Ok(Arc::new(store))
        }
    }
}

async fn build_renderer(config: &CardsConfig) -> Result<Arc<dyn CardRenderer>, BootstrapError> {
    let renderer = match &config.template_dir {
        Some(dir) => AdaptiveCardRenderer::from_dir(dir).await?,
        None => AdaptiveCardRenderer::embedded()?,
    };
    Ok(Arc::new(renderer))
}
