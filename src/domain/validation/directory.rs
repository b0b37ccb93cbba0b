//! Availability validation service.
//!
//! The booking steps only see the `AvailabilityValidator` trait. The bundled
//! `StaticDirectory` answers from a fixed table of known employees and can
//! be replaced by a directory or availability backend without touching step
//! logic.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::validity::Validity::{Invalid, Valid};
use super::validity::ValidityResult;

/// Errors raised by an availability backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AvailabilityError {
    #[error("Availability service unavailable: {0}")]
    Unavailable(String),
}

/// Maps an employee identifier to its validity across all booking stages.
#[async_trait]
pub trait AvailabilityValidator: Send + Sync {
    /// Validate an employee identifier.
    ///
    /// # Returns
    /// `Ok(None)` for an identifier the backend does not recognize.
    ///
    /// # Errors
    /// Returns `AvailabilityError` if the backend cannot be consulted.
    async fn validate(&self, employee_id: &str) -> Result<Option<ValidityResult>, AvailabilityError>;
}

static KNOWN_EMPLOYEES: Lazy<HashMap<&'static str, ValidityResult>> = Lazy::new(|| {
    HashMap::from([
        // Employee: no office space, no free floor.
        ("123456", ValidityResult::from_flags([Valid, Invalid, Valid, Invalid])),
        // Senior executive: everything available.
        ("234567", ValidityResult::from_flags([Valid, Valid, Valid, Valid])),
        // Inactive employee.
        ("345678", ValidityResult::from_flags([Invalid, Invalid, Valid, Valid])),
    ])
});

/// Fixed lookup table of known employee identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticDirectory;

impl StaticDirectory {
    pub fn new() -> Self {
        Self
    }

    /// Pure lookup used by the async trait implementation.
    pub fn lookup(&self, employee_id: &str) -> Option<ValidityResult> {
        KNOWN_EMPLOYEES.get(employee_id.trim()).copied()
    }
}

#[async_trait]
impl AvailabilityValidator for StaticDirectory {
    async fn validate(&self, employee_id: &str) -> Result<Option<ValidityResult>, AvailabilityError> {
        Ok(self.lookup(employee_id))
    }
}
