//! Slot domain module.
//!
//! Typed per-conversation field storage with the filled/empty semantics the
//! dialog steps rely on.

mod field;
mod slot_state;

pub use field::SlotField;
pub use slot_state::SlotState;
