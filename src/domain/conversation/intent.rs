//! Classified user intent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::slots::SlotField;

/// Top-level intent recognized by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    #[default]
    None,
    Welcome,
    BookFacilities,
    NavigateFacilities,
    EndConversation,
    /// A label the orchestrator does not dispatch on.
    Other(String),
}

impl Intent {
    /// Parses a classifier label. Matching ignores case.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Self::None,
            "welcome" => Self::Welcome,
            "bookfacilities" => Self::BookFacilities,
            "navigatefacilities" => Self::NavigateFacilities,
            "endconversation" => Self::EndConversation,
            _ => Self::Other(label.trim().to_string()),
        }
    }

    /// The canonical classifier label.
    pub fn label(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Welcome => "welcome",
            Self::BookFacilities => "bookfacilities",
            Self::NavigateFacilities => "navigatefacilities",
            Self::EndConversation => "endConversation",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Intent label plus the entity values extracted from the same utterance.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IntentResult {
    pub intent: Intent,
    pub entities: BTreeMap<SlotField, String>,
}

impl IntentResult {
    /// Creates a result with no entities.
    pub fn new(intent: Intent) -> Self {
        Self {
            intent,
            entities: BTreeMap::new(),
        }
    }

    /// The degraded result used when classification fails.
    pub fn none() -> Self {
        Self::new(Intent::None)
    }

    /// Adds an entity value. Only classifier-extractable slots are kept and
    /// empty values are dropped.
    pub fn with_entity(mut self, field: SlotField, value: impl Into<String>) -> Self {
        let value = value.into();
        if field.is_entity() && !value.is_empty() {
            self.entities.insert(field, value);
        }
        self
    }

    /// Returns the extracted value for an entity slot.
    pub fn entity(&self, field: SlotField) -> Option<&str> {
        self.entities.get(&field).map(String::as_str)
    }
}
