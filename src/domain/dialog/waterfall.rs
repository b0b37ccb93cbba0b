//! Waterfall engine.
//!
//! Sequences a flow's ordered steps against the dialog stack. Every operation
//! runs steps until one of them suspends on a prompt, the stack drains, or
//! the dialog is cancelled.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::conversation::Reply;
use crate::domain::slots::SlotState;

use super::flow::{Flow, FlowOptions, StepContext, StepOutcome};
use super::stack::{AnswerBinding, DialogFrame, DialogStack, FlowName};

/// Upper bound on step executions within a single engine call.
pub const MAX_STEPS_PER_TURN: usize = 64;

/// Errors raised by the engine itself. Step failures never surface here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialogError {
    #[error("Flow not registered: {0}")]
    UnknownFlow(FlowName),

    #[error("No active dialog")]
    EmptyStack,

    #[error("Flow {flow} exceeded {limit} steps in one turn")]
    StepLimitExceeded { flow: FlowName, limit: usize },
}

/// State of the dialog after an engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogTurnStatus {
    /// Nothing was active to run.
    Empty,
    /// The top frame is suspended on a prompt.
    Waiting,
    /// The last frame ended and the stack is empty.
    Complete,
    /// A step cancelled every dialog.
    Cancelled,
}

/// Mutable conversation state an engine call works against.
pub struct DialogContext<'a> {
    pub stack: &'a mut DialogStack,
    pub slots: &'a mut SlotState,
    pub replies: &'a mut Vec<Reply>,
}

impl<'a> DialogContext<'a> {
    pub fn new(
        stack: &'a mut DialogStack,
        slots: &'a mut SlotState,
        replies: &'a mut Vec<Reply>,
    ) -> Self {
        Self {
            stack,
            slots,
            replies,
        }
    }
}

/// Registry of flows plus the step sequencing rules.
#[derive(Default, Clone)]
pub struct WaterfallEngine {
    flows: HashMap<FlowName, Arc<dyn Flow>>,
}

impl WaterfallEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration.
    pub fn with_flow(mut self, flow: Arc<dyn Flow>) -> Self {
        self.register(flow);
        self
    }

    /// Registers a flow under its own name, replacing any previous one.
    pub fn register(&mut self, flow: Arc<dyn Flow>) {
        self.flows.insert(flow.name(), flow);
    }

    /// Pushes `flow` at step 0 and runs it. `options` reach its first step.
    pub async fn begin(
        &self,
        ctx: &mut DialogContext<'_>,
        flow: FlowName,
        options: FlowOptions,
    ) -> Result<DialogTurnStatus, DialogError> {
        self.lookup(&flow)?;
        debug!(flow = %flow, depth = ctx.stack.depth(), "Beginning dialog");
        ctx.stack.push(DialogFrame::new(flow));
        self.run(ctx, Some(options), None).await
    }

    /// Pops the top frame, pushes `flow` in its place, and runs it.
    pub async fn replace_top(
        &self,
        ctx: &mut DialogContext<'_>,
        flow: FlowName,
        options: FlowOptions,
    ) -> Result<DialogTurnStatus, DialogError> {
        self.lookup(&flow)?;
        Self::swap_top(ctx.stack, flow);
        self.run(ctx, Some(options), None).await
    }

    /// Feeds `answer` to the top frame and continues it.
    ///
    /// A slot-bound prompt stores the answer and re-runs the same step. An
    /// unbound prompt advances and hands the raw answer to the next step.
    pub async fn resume(
        &self,
        ctx: &mut DialogContext<'_>,
        answer: &str,
    ) -> Result<DialogTurnStatus, DialogError> {
        let Some(frame) = ctx.stack.top_mut() else {
            return Ok(DialogTurnStatus::Empty);
        };
        debug!(flow = %frame.flow, step = frame.step, "Resuming dialog");

        let raw_answer = match frame.awaiting.take() {
            Some(AnswerBinding::Slot(field)) => {
                ctx.slots.set(field, answer);
                None
            }
            Some(AnswerBinding::NextStep) => {
                frame.advance();
                Some(answer.to_string())
            }
            None => Some(answer.to_string()),
        };
        self.run(ctx, None, raw_answer).await
    }

    /// Pops the top frame. A parent frame continues at its next step.
    pub async fn end_top(
        &self,
        ctx: &mut DialogContext<'_>,
    ) -> Result<DialogTurnStatus, DialogError> {
        if ctx.stack.pop().is_none() {
            return Err(DialogError::EmptyStack);
        }
        match ctx.stack.top_mut() {
            Some(parent) => {
                parent.advance();
                self.run(ctx, None, None).await
            }
            None => Ok(DialogTurnStatus::Complete),
        }
    }

    /// Clears every active frame.
    pub fn cancel_all(&self, ctx: &mut DialogContext<'_>) -> DialogTurnStatus {
        debug!(depth = ctx.stack.depth(), "Cancelling all dialogs");
        ctx.stack.clear();
        DialogTurnStatus::Cancelled
    }

    fn lookup(&self, name: &FlowName) -> Result<Arc<dyn Flow>, DialogError> {
        self.flows
            .get(name)
            .cloned()
            .ok_or_else(|| DialogError::UnknownFlow(name.clone()))
    }

    fn swap_top(stack: &mut DialogStack, flow: FlowName) {
        let restarts = match stack.top() {
            Some(previous) if previous.flow == flow => previous.restarts.saturating_add(1),
            _ => 0,
        };
        if restarts > 0 {
            warn!(flow = %flow, restarts, "Flow restarted in place");
        }
        stack.replace_top(DialogFrame::new(flow).with_restarts(restarts));
    }

    async fn run(
        &self,
        ctx: &mut DialogContext<'_>,
        mut options: Option<FlowOptions>,
        mut answer: Option<String>,
    ) -> Result<DialogTurnStatus, DialogError> {
        let mut last_flow = None;

        for _ in 0..MAX_STEPS_PER_TURN {
            let Some(frame) = ctx.stack.top() else {
                return Ok(DialogTurnStatus::Complete);
            };
            let flow = self.lookup(&frame.flow)?;
            let index = frame.step;
            let steps = flow.steps();
            last_flow = Some(frame.flow.clone());

            let outcome = match steps.get(index) {
                None => StepOutcome::End,
                Some(step) => {
                    debug!(flow = %frame.flow, step = *step, "Running step");
                    let mut step_ctx =
                        StepContext::new(ctx.slots, ctx.replies, options.take(), answer.take());
                    match flow.run_step(index, &mut step_ctx).await {
                        Ok(outcome) => outcome,
                        Err(err) => {
                            warn!(flow = %flow.name(), step = *step, error = %err, "Step failed");
                            ctx.replies.push(Reply::text(format!("Error in {}", step)));
                            StepOutcome::End
                        }
                    }
                }
            };

            match outcome {
                StepOutcome::Next => {
                    if let Some(frame) = ctx.stack.top_mut() {
                        frame.advance();
                    }
                }
                StepOutcome::Prompt { text, binding } => {
                    ctx.replies.push(Reply::text(text));
                    if let Some(frame) = ctx.stack.top_mut() {
                        frame.awaiting = Some(binding);
                    }
                    return Ok(DialogTurnStatus::Waiting);
                }
                StepOutcome::Replace { flow, options: next } => {
                    self.lookup(&flow)?;
                    Self::swap_top(ctx.stack, flow);
                    options = Some(next);
                }
                StepOutcome::Begin { flow, options: next } => {
                    self.lookup(&flow)?;
                    debug!(flow = %flow, "Beginning child dialog");
                    ctx.stack.push(DialogFrame::new(flow));
                    options = Some(next);
                }
                StepOutcome::End => {
                    ctx.stack.pop();
                    match ctx.stack.top_mut() {
                        Some(parent) => parent.advance(),
                        None => return Ok(DialogTurnStatus::Complete),
                    }
                }
                StepOutcome::CancelAll => return Ok(self.cancel_all(ctx)),
            }
        }

        Err(DialogError::StepLimitExceeded {
            flow: last_flow.unwrap_or_else(|| FlowName::new("unknown")),
            limit: MAX_STEPS_PER_TURN,
        })
    }
}

impl std::fmt::Debug for WaterfallEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaterfallEngine")
            .field("flows", &self.flows.keys().collect::<Vec<_>>())
            .finish()
    }
}
