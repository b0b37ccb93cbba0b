//! Yes/No confirmation flow.
//!
//! Entered by replacing a booking frame after a rejection. Answering "yes"
//! starts a fresh booking; anything else closes the conversation politely.

use async_trait::async_trait;

use crate::domain::dialog::{Flow, FlowName, FlowOptions, StepContext, StepError, StepOutcome};

use super::prompts;

const STEPS: &[&str] = &["ask_confirmation", "apply_confirmation"];

/// The only answer treated as consent.
const CONSENT: &str = "yes";

#[derive(Debug, Clone, Copy, Default)]
pub struct YesNoFlow;

impl YesNoFlow {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Flow for YesNoFlow {
    fn name(&self) -> FlowName {
        FlowName::YES_NO
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
            0 => Ok(StepOutcome::ask(prompts::YES_NO)),
            1 => {
                if ctx.answer() == Some(CONSENT) {
                    return Ok(StepOutcome::replace(FlowName::BOOKING, FlowOptions::fresh()));
                }
                ctx.say(prompts::ANYTHING_ELSE_AFTER_DECLINE);
                Ok(StepOutcome::End)
            }
            other => Err(StepError::UnknownStep(other)),
        }
    }
}
