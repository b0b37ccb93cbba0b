//! Named slots of the per-conversation record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// A single named field of the data collected during a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SlotField {
    FacilityType,
    #[serde(rename = "EmployeeID")]
    EmployeeId,
    #[serde(rename = "FacilityID")]
    FacilityId,
    FacilityPreference,
    PersonAmount,
    Floor,
    Date,
    Time,
    #[serde(rename = "PreviousQnAID")]
    PreviousQnaId,
    #[serde(rename = "PreviousQnAQuestionAsked")]
    PreviousQnaQuestionAsked,
    Question,
    Log,
}

impl SlotField {
    /// Every recognized slot, in declaration order.
    pub const ALL: [SlotField; 12] = [
        SlotField::FacilityType,
        SlotField::EmployeeId,
        SlotField::FacilityId,
        SlotField::FacilityPreference,
        SlotField::PersonAmount,
        SlotField::Floor,
        SlotField::Date,
        SlotField::Time,
        SlotField::PreviousQnaId,
        SlotField::PreviousQnaQuestionAsked,
        SlotField::Question,
        SlotField::Log,
    ];

    /// Slots that the intent classifier can extract as entities.
    pub const ENTITIES: [SlotField; 7] = [
        SlotField::FacilityType,
        SlotField::EmployeeId,
        SlotField::FacilityId,
        SlotField::FacilityPreference,
        SlotField::PersonAmount,
        SlotField::Floor,
        SlotField::Date,
    ];

    /// Canonical field name, shared with classifier entity names.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FacilityType => "FacilityType",
            Self::EmployeeId => "EmployeeID",
            Self::FacilityId => "FacilityID",
            Self::FacilityPreference => "FacilityPreference",
            Self::PersonAmount => "PersonAmount",
            Self::Floor => "Floor",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::PreviousQnaId => "PreviousQnAID",
            Self::PreviousQnaQuestionAsked => "PreviousQnAQuestionAsked",
            Self::Question => "Question",
            Self::Log => "Log",
        }
    }

    /// Returns true if the classifier can supply this slot.
    pub fn is_entity(&self) -> bool {
        Self::ENTITIES.contains(self)
    }
}

impl fmt::Display for SlotField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SlotField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::invalid_format("slot", format!("unknown slot '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for field in SlotField::ALL {
            assert_eq!(field.name().parse::<SlotField>().unwrap(), field);
        }
    }

    #[test]
    fn parsing_ignores_case() {
        assert_eq!("employeeid".parse::<SlotField>().unwrap(), SlotField::EmployeeId);
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!("Budget".parse::<SlotField>().is_err());
    }

    #[test]
    fn entity_slots_exclude_bookkeeping_fields() {
        assert!(SlotField::Date.is_entity());
        assert!(!SlotField::Time.is_entity());
        assert!(!SlotField::Log.is_entity());
    }

    #[test]
    fn serializes_with_canonical_name() {
        let json = serde_json::to_string(&SlotField::EmployeeId).unwrap();
        assert_eq!(json, "\"EmployeeID\"");
    }
}
