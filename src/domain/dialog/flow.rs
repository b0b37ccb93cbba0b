//! Flow and step contracts.
//!
//! A flow is an ordered list of named steps. The waterfall engine calls
//! `Flow::run_step` for the top frame's step index and acts on the returned
//! `StepOutcome`.

use async_trait::async_trait;

use crate::domain::conversation::{IntentResult, Reply};
use crate::domain::slots::{SlotField, SlotState};
use crate::domain::validation::AvailabilityError;

use super::stack::{AnswerBinding, FlowName};

/// Payload handed to the first step of a newly begun flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOptions {
    /// Leave the slot state as it is.
    Carry,
    /// Seed entity slots from a classification result.
    Seed(IntentResult),
}

impl FlowOptions {
    /// Seed options with no entities, forcing every entity slot to be asked.
    pub fn fresh() -> Self {
        Self::Seed(IntentResult::none())
    }
}

/// What a step asks the engine to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Pass through to the next step.
    Next,
    /// Emit a question and suspend the frame.
    Prompt { text: String, binding: AnswerBinding },
    /// Pop this frame and begin another flow in its place.
    Replace { flow: FlowName, options: FlowOptions },
    /// Push a child flow; this frame continues after the child ends.
    Begin { flow: FlowName, options: FlowOptions },
    /// Finish this frame.
    End,
    /// Abandon every active flow.
    CancelAll,
}

impl StepOutcome {
    /// Prompt whose answer fills `slot`.
    pub fn prompt_for(slot: SlotField, text: impl Into<String>) -> Self {
        Self::Prompt {
            text: text.into(),
            binding: AnswerBinding::Slot(slot),
        }
    }

    /// Prompt whose raw answer goes to the next step.
    pub fn ask(text: impl Into<String>) -> Self {
        Self::Prompt {
            text: text.into(),
            binding: AnswerBinding::NextStep,
        }
    }

    pub fn replace(flow: FlowName, options: FlowOptions) -> Self {
        Self::Replace { flow, options }
    }

    /// Skip-if-filled: pass through when `slot` already holds a value,
    /// otherwise prompt for it.
    pub fn next_or_prompt(slots: &SlotState, slot: SlotField, text: impl Into<String>) -> Self {
        if slots.is_filled(slot) {
            Self::Next
        } else {
            Self::prompt_for(slot, text)
        }
    }
}

/// Errors raised inside a step. The engine turns them into a fail-soft reply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Availability(#[from] AvailabilityError),

    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Required slot {0} is empty")]
    MissingSlot(SlotField),

    #[error("Step index {0} does not exist")]
    UnknownStep(usize),
}

/// Mutable view a step works against.
pub struct StepContext<'a> {
    pub slots: &'a mut SlotState,
    replies: &'a mut Vec<Reply>,
    options: Option<FlowOptions>,
    answer: Option<String>,
}

impl<'a> StepContext<'a> {
    pub fn new(
        slots: &'a mut SlotState,
        replies: &'a mut Vec<Reply>,
        options: Option<FlowOptions>,
        answer: Option<String>,
    ) -> Self {
        Self {
            slots,
            replies,
            options,
            answer,
        }
    }

    /// Options of a freshly begun flow. `None` on every later invocation.
    pub fn take_options(&mut self) -> Option<FlowOptions> {
        self.options.take()
    }

    /// Raw answer to a prompt bound to `AnswerBinding::NextStep`.
    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    /// Queues an outgoing reply.
    pub fn send(&mut self, reply: Reply) {
        self.replies.push(reply);
    }

    /// Queues an outgoing text reply.
    pub fn say(&mut self, text: impl Into<String>) {
        self.send(Reply::text(text));
    }
}

/// A named, ordered sequence of steps.
#[async_trait]
pub trait Flow: Send + Sync {
    /// Registry name of the flow.
    fn name(&self) -> FlowName;

    /// Step names in execution order.
    fn steps(&self) -> &'static [&'static str];

    /// Executes the step at `index` against the context.
    async fn run_step(
        &self,
        index: usize,
        ctx: &mut StepContext<'_>,
    ) -> Result<StepOutcome, StepError>;
}
