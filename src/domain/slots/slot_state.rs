//! Slot State Entity
//!
//! The mutable per-conversation record of collected field values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::field::SlotField;

/// Collected field values for one conversation.
///
/// A slot is filled only when it holds a non-empty string. Setting a slot to
/// an empty string is the same as clearing it, so the map never stores empty
/// values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotState {
    values: BTreeMap<SlotField, String>,
}

impl SlotState {
    /// Creates an empty slot state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot value if filled.
    pub fn get(&self, field: SlotField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// Returns the slot value, or an empty string when unfilled.
    pub fn value(&self, field: SlotField) -> &str {
        self.get(field).unwrap_or_default()
    }

    /// Returns true if the slot holds a non-empty value.
    pub fn is_filled(&self, field: SlotField) -> bool {
        self.values.contains_key(&field)
    }

    /// Sets a slot. Empty input clears it.
    pub fn set(&mut self, field: SlotField, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.values.remove(&field);
        } else {
            self.values.insert(field, value);
        }
    }

    /// Clears a slot so that its question is asked again.
    pub fn clear(&mut self, field: SlotField) {
        self.values.remove(&field);
    }

    /// Number of filled slots.
    pub fn filled_count(&self) -> usize {
        self.values.len()
    }
}
