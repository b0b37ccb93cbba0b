//! Dialog module.
//!
//! Waterfall flows, the dialog stack they run on, and the engine that
//! sequences steps across turns.
//!
//! # Turn model
//!
//! A step either passes through, prompts and suspends, branches by replacing
//! its frame, or ends. A suspended frame keeps its step index; the next turn
//! resumes it at the same step with the user's answer.

mod flow;
mod stack;
mod waterfall;

pub use flow::{Flow, FlowOptions, StepContext, StepError, StepOutcome};
pub use stack::{AnswerBinding, DialogFrame, DialogStack, FlowName};
pub use waterfall::{
    DialogContext, DialogError, DialogTurnStatus, WaterfallEngine, MAX_STEPS_PER_TURN,
};
