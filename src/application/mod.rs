//! Application layer - Flows, handlers and wiring.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//!
//! - `flows` - Booking, navigation and yes/no waterfall flows
//! - `handlers` - The per-turn conversation orchestrator
//! - `bootstrap` - Builds a handler from configuration

pub mod bootstrap;
pub mod flows;
pub mod handlers;

pub use bootstrap::{build_turn_handler, BootstrapError};
pub use flows::{facility_engine, BookingFlow, NavigationFlow, YesNoFlow};
pub use handlers::{HandleTurnCommand, TurnError, TurnHandler};
