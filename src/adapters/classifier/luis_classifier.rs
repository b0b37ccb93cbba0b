//! LUIS Classifier - Implementation of IntentClassifier for LUIS v2 apps.
//!
//! Calls the v2 prediction endpoint and maps the top-scoring intent and the
//! first value of each recognized entity into an `IntentResult`. Labels and
//! entity values are lowercased, matching what the booking flow compares
//! against.
//!
//! # Configuration
//!
//! ```ignore
//! let config = LuisConfig::new(app_id, api_key, "westus.api.cognitive.microsoft.com")
//!     .with_timeout(Duration::from_secs(5));
//!
//! let classifier = LuisIntentClassifier::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::domain::conversation::{Intent, IntentResult};
use crate::domain::slots::SlotField;
use crate::ports::{ClassifierError, IntentClassifier};

/// Entity type prefix of the prebuilt date/time recognizer.
const DATETIME_ENTITY_PREFIX: &str = "builtin.datetimev2";

/// Configuration for the LUIS classifier.
#[derive(Debug, Clone)]
pub struct LuisConfig {
    /// LUIS application id.
    pub app_id: String,
    /// Subscription key.
    api_key: Secret<String>,
    /// Endpoint host, with or without scheme.
    pub host: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl LuisConfig {
    /// Creates a new configuration.
    pub fn new(app_id: impl Into<String>, api_key: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            api_key: Secret::new(api_key.into()),
            host: host.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the subscription key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Builds the prediction endpoint URL.
    fn prediction_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        let base = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        };
        format!("{}/luis/v2.0/apps/{}", base, self.app_id)
    }
}

/// LUIS prediction client.
pub struct LuisIntentClassifier {
    config: LuisConfig,
    client: Client,
}

impl LuisIntentClassifier {
    /// Creates a classifier with its own HTTP client.
    ///
    /// # Errors
    /// Returns `ClassifierError::Provider` if the HTTP client cannot be built.
    pub fn new(config: LuisConfig) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClassifierError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Sends the prediction request.
    async fn send_request(&self, text: &str) -> Result<Response, ClassifierError> {
        self.client
            .get(self.config.prediction_url())
            .query(&[
                ("subscription-key", self.config.api_key()),
                ("q", text),
                ("verbose", "true"),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassifierError::Timeout
                } else if e.is_connect() {
                    ClassifierError::Network(format!("Connection failed: {}", e))
                } else {
                    ClassifierError::Network(e.to_string())
                }
            })
    }

    /// Maps non-success statuses to classifier errors.
    async fn handle_response_status(response: Response) -> Result<Response, ClassifierError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(ClassifierError::AuthenticationFailed(error_body)),
            429 => Err(ClassifierError::RateLimited),
            500..=599 => Err(ClassifierError::Provider(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(ClassifierError::Provider(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }
}

#[async_trait]
impl IntentClassifier for LuisIntentClassifier {
    async fn classify(&self, text: &str) -> Result<IntentResult, ClassifierError> {
        let response = self.send_request(text).await?;
        let response = Self::handle_response_status(response).await?;

        let prediction: LuisPrediction = response
            .json()
            .await
            .map_err(|e| ClassifierError::Parse(e.to_string()))?;

        let result = interpret(prediction);
        debug!(
            intent = %result.intent,
            entities = result.entities.len(),
            "LUIS prediction"
        );
        Ok(result)
    }
}

/// Converts a prediction into an intent result.
fn interpret(prediction: LuisPrediction) -> IntentResult {
    let label = prediction
        .top_scoring_intent
        .map(|top| top.intent)
        .unwrap_or_default()
        .to_lowercase();

    let mut result = IntentResult::new(Intent::from_label(&label));
    for entity in prediction.entities {
        let Some(field) = entity_field(&entity.entity_type) else {
            continue;
        };
        // First value per entity wins
        if result.entity(field).is_some() {
            continue;
        }
        let value = if field == SlotField::Date {
            entity.resolved_value().unwrap_or(entity.entity)
        } else {
            entity.entity
        };
        result = result.with_entity(field, value.trim().to_lowercase());
    }
    result
}

fn entity_field(entity_type: &str) -> Option<SlotField> {
    if entity_type.to_ascii_lowercase().starts_with(DATETIME_ENTITY_PREFIX) {
        return Some(SlotField::Date);
    }
    entity_type
        .parse::<SlotField>()
        .ok()
        .filter(|field| field.is_entity() && *field != SlotField::Date)
}

// ============================================================================
// LUIS API types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LuisPrediction {
    #[serde(default)]
    top_scoring_intent: Option<LuisIntent>,
    #[serde(default)]
    entities: Vec<LuisEntity>,
}

#[derive(Debug, Deserialize)]
struct LuisIntent {
    intent: String,
}

#[derive(Debug, Deserialize)]
struct LuisEntity {
    entity: String,
    #[serde(rename = "type")]
    entity_type: String,
    #[serde(default)]
    resolution: Option<Value>,
}

impl LuisEntity {
    /// First resolved value of a date/time entity, e.g. `2019-05-02`.
    fn resolved_value(&self) -> Option<String> {
        self.resolution
            .as_ref()?
            .get("values")?
            .as_array()?
            .first()?
            .get("value")?
            .as_str()
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> IntentResult {
        interpret(serde_json::from_value(value).unwrap())
    }

    mod config {
        use super::*;

        #[test]
        fn bare_host_gets_https_scheme() {
            let config = LuisConfig::new("app-1", "key", "westus.api.cognitive.microsoft.com");
            assert_eq!(
                config.prediction_url(),
                "https://westus.api.cognitive.microsoft.com/luis/v2.0/apps/app-1"
            );
        }

        #[test]
        fn explicit_scheme_is_kept() {
            let config = LuisConfig::new("app-1", "key", "http://localhost:8080/");
            assert_eq!(
                config.prediction_url(),
                "http://localhost:8080/luis/v2.0/apps/app-1"
            );
        }

        #[test]
        fn builder_sets_timeout_and_keeps_key() {
            let config = LuisConfig::new("a", "secret-key", "h").with_timeout(Duration::from_secs(3));
            assert_eq!(config.timeout, Duration::from_secs(3));
            assert_eq!(config.api_key(), "secret-key");
        }
    }

    mod interpretation {
        use super::*;

        #[test]
        fn top_intent_is_lowercased() {
            let result = parse(json!({
                "query": "book a cubicle",
                "topScoringIntent": { "intent": "BookFacilities", "score": 0.93 },
                "entities": []
            }));
            assert_eq!(result.intent, Intent::BookFacilities);
        }

        #[test]
        fn end_conversation_label_is_recognized_after_lowercasing() {
            let result = parse(json!({
                "topScoringIntent": { "intent": "endConversation", "score": 0.8 }
            }));
            assert_eq!(result.intent, Intent::EndConversation);
        }

        #[test]
        fn missing_top_intent_is_none() {
            let result = parse(json!({ "query": "??" }));
            assert_eq!(result.intent, Intent::None);
        }

        #[test]
        fn entities_map_to_slots_and_lowercase() {
            let result = parse(json!({
                "topScoringIntent": { "intent": "bookfacilities", "score": 0.9 },
                "entities": [
                    { "entity": "Office Space", "type": "FacilityType", "startIndex": 7, "endIndex": 18 },
                    { "entity": "234567", "type": "EmployeeID" },
                    { "entity": "4", "type": "Floor" }
                ]
            }));
            assert_eq!(result.entity(SlotField::FacilityType), Some("office space"));
            assert_eq!(result.entity(SlotField::EmployeeId), Some("234567"));
            assert_eq!(result.entity(SlotField::Floor), Some("4"));
        }

        #[test]
        fn first_value_per_entity_wins() {
            let result = parse(json!({
                "entities": [
                    { "entity": "cubicle", "type": "FacilityType" },
                    { "entity": "meeting room", "type": "FacilityType" }
                ]
            }));
            assert_eq!(result.entity(SlotField::FacilityType), Some("cubicle"));
        }

        #[test]
        fn date_comes_from_datetime_resolution() {
            let result = parse(json!({
                "entities": [{
                    "entity": "tomorrow",
                    "type": "builtin.datetimeV2.date",
                    "resolution": { "values": [{ "timex": "2019-05-02", "type": "date", "value": "2019-05-02" }] }
                }]
            }));
            assert_eq!(result.entity(SlotField::Date), Some("2019-05-02"));
        }

        #[test]
        fn date_falls_back_to_entity_text() {
            let result = parse(json!({
                "entities": [{ "entity": "Next Week", "type": "builtin.datetimeV2.daterange" }]
            }));
            assert_eq!(result.entity(SlotField::Date), Some("next week"));
        }

        #[test]
        fn unknown_entity_types_are_ignored() {
            let result = parse(json!({
                "entities": [
                    { "entity": "blue", "type": "Colour" },
                    { "entity": "log me", "type": "Log" }
                ]
            }));
            assert!(result.entities.is_empty());
        }
    }
}
