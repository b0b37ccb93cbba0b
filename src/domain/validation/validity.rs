//! Validity value objects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single validation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Validity {
    Valid,
    Invalid,
}

impl Validity {
    /// Returns true for `Valid`.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl From<bool> for Validity {
    fn from(valid: bool) -> Self {
        if valid {
            Self::Valid
        } else {
            Self::Invalid
        }
    }
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => f.write_str("VALID"),
            Self::Invalid => f.write_str("INVALID"),
        }
    }
}

/// The four decision points the booking flow consults, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStage {
    /// The identifier belongs to an active employee.
    Role,
    /// The employee holds senior-executive privileges.
    Restriction,
    /// A facility is free on the requested date.
    DateAvailability,
    /// A facility is free on the requested floor.
    FloorAvailability,
}

impl ValidationStage {
    /// All stages in evaluation order.
    pub const ORDER: [ValidationStage; 4] = [
        ValidationStage::Role,
        ValidationStage::Restriction,
        ValidationStage::DateAvailability,
        ValidationStage::FloorAvailability,
    ];
}

/// Ordered 4-tuple of validity flags for one employee identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityResult {
    pub role: Validity,
    pub restriction: Validity,
    pub date: Validity,
    pub floor: Validity,
}

impl ValidityResult {
    /// Builds a result from flags given in stage order.
    pub const fn from_flags(flags: [Validity; 4]) -> Self {
        Self {
            role: flags[0],
            restriction: flags[1],
            date: flags[2],
            floor: flags[3],
        }
    }

    /// Returns the flag for a stage.
    pub fn stage(&self, stage: ValidationStage) -> Validity {
        match stage {
            ValidationStage::Role => self.role,
            ValidationStage::Restriction => self.restriction,
            ValidationStage::DateAvailability => self.date,
            ValidationStage::FloorAvailability => self.floor,
        }
    }

    /// Returns true if the restriction stage grants senior-executive access.
    pub fn is_senior_executive(&self) -> bool {
        self.restriction.is_valid()
    }
}
