//! Intent Classifier Adapters.
//!
//! Implementations of the IntentClassifier port.
//!
//! ## Available Adapters
//!
//! - `LuisIntentClassifier` - LUIS v2 prediction endpoint
//! - `KeywordIntentClassifier` - Offline keyword rules
//! - `MockIntentClassifier` - Scripted results for testing

mod keyword_classifier;
mod luis_classifier;
mod mock_classifier;

pub use keyword_classifier::KeywordIntentClassifier;
pub use luis_classifier::{LuisConfig, LuisIntentClassifier};
pub use mock_classifier::MockIntentClassifier;
