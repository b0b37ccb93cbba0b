//! Turn handlers.
//!
//! The conversation orchestrator and the per-conversation locking it relies
//! on.

mod handle_turn;
mod keyed_locks;

pub use handle_turn::{HandleTurnCommand, TurnError, TurnHandler, DEFAULT_TURN_TIMEOUT};
pub use keyed_locks::{KeyedLocks, TurnPermit};
