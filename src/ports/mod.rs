//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `IntentClassifier` - Intent and entity recognition
//! - `CardRenderer` - Rich reply templates
//! - `SessionStore` - Per-conversation session persistence

mod card_renderer;
mod intent_classifier;
mod session_store;

pub use card_renderer::{CardRenderer, CardTemplate, CardValues, RenderError};
pub use intent_classifier::{ClassifierError, IntentClassifier};
pub use session_store::{SessionStore, SessionStoreError};
