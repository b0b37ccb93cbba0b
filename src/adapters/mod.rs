//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `classifier` - Intent classifiers (LUIS, keyword rules, scripted mock)
//! - `cards` - Adaptive card rendering
//! - `storage` - Session stores (in-memory, YAML files, Redis)

pub mod cards;
pub mod classifier;
pub mod storage;

pub use cards::AdaptiveCardRenderer;
pub use classifier::{KeywordIntentClassifier, LuisConfig, LuisIntentClassifier, MockIntentClassifier};
pub use storage::{FileSessionStore, InMemorySessionStore, RedisSessionStore};
