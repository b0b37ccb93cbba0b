//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod turn;

pub use turn::{HandleTurnCommand, TurnError, TurnHandler};
