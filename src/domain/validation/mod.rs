//! Validation/availability engine.
//!
//! Decides whether a collected employee identifier is acceptable at each of
//! the booking flow's decision points.

mod directory;
mod validity;

pub use directory::{AvailabilityError, AvailabilityValidator, StaticDirectory};
pub use validity::{ValidationStage, Validity, ValidityResult};
