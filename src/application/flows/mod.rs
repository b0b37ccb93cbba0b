//! Facility flows.
//!
//! - `booking` - Collects and validates a facility booking
//! - `navigation` - Tells the user where a facility is
//! - `yes_no` - Follow-up question after a rejected booking

mod booking;
mod navigation;
pub mod prompts;
mod yes_no;

pub use booking::BookingFlow;
pub use navigation::NavigationFlow;
pub use yes_no::YesNoFlow;

use std::sync::Arc;

use crate::domain::dialog::WaterfallEngine;
use crate::domain::validation::AvailabilityValidator;
use crate::ports::CardRenderer;

/// Engine with the booking, navigation and yes/no flows registered.
pub fn facility_engine(
    validator: Arc<dyn AvailabilityValidator>,
    renderer: Arc<dyn CardRenderer>,
) -> WaterfallEngine {
    WaterfallEngine::new()
        .with_flow(Arc::new(BookingFlow::new(validator, renderer)))
        .with_flow(Arc::new(NavigationFlow::new()))
        .with_flow(Arc::new(YesNoFlow::new()))
}
