//! Navigation flow.
//!
//! Asks which facility the user is looking for and tells them where it is.

use async_trait::async_trait;

use crate::domain::dialog::{Flow, FlowName, FlowOptions, StepContext, StepError, StepOutcome};
use crate::domain::slots::SlotField;

use super::prompts;

const STEPS: &[&str] = &["ask_destination", "announce_location"];

#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationFlow;

impl NavigationFlow {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Flow for NavigationFlow {
    fn name(&self) -> FlowName {
        FlowName::NAVIGATION
    }

    fn steps(&self) -> &'static [&'static str] {
        STEPS
    }

    async fn run_step(
        &self,
        index: usize,
        ctx: &mut StepContext<'_>,
    ) -> Result<StepOutcome, StepError> {
        match index {
            0 => {
                if let Some(FlowOptions::Seed(result)) = ctx.take_options() {
                    ctx.slots.set(
                        SlotField::FacilityId,
                        result.entity(SlotField::FacilityId).unwrap_or_default(),
                    );
                }
                Ok(StepOutcome::next_or_prompt(
                    ctx.slots,
                    SlotField::FacilityId,
                    prompts::ASK_DESTINATION,
                ))
            }
            1 => {
                let announcement = prompts::location_of(ctx.slots.value(SlotField::FacilityId));
                ctx.say(announcement);
                Ok(StepOutcome::End)
            }
            other => Err(StepError::UnknownStep(other)),
        }
    }
}
