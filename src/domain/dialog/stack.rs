//! Dialog stack and frames.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::domain::slots::SlotField;

/// Name under which a flow is registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowName(Cow<'static, str>);

impl FlowName {
    pub const BOOKING: FlowName = FlowName(Cow::Borrowed("booking"));
    pub const NAVIGATION: FlowName = FlowName(Cow::Borrowed("navigation"));
    pub const YES_NO: FlowName = FlowName(Cow::Borrowed("YesNo"));

    /// Creates a flow name, typically for flows registered by embedders.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlowName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the answer to an outstanding prompt goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "slot", rename_all = "snake_case")]
pub enum AnswerBinding {
    /// Write the answer into the slot and re-run the prompting step.
    Slot(SlotField),
    /// Advance to the next step and hand it the raw answer.
    NextStep,
}

/// One active flow invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogFrame {
    pub flow: FlowName,
    /// Index of the next step to execute.
    pub step: usize,
    /// Binding of the prompt this frame is waiting on, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awaiting: Option<AnswerBinding>,
    /// How many times this flow restarted itself in place.
    #[serde(default)]
    pub restarts: u32,
}

impl DialogFrame {
    /// A fresh frame positioned at step 0.
    pub fn new(flow: FlowName) -> Self {
        Self {
            flow,
            step: 0,
            awaiting: None,
            restarts: 0,
        }
    }

    pub fn with_restarts(mut self, restarts: u32) -> Self {
        self.restarts = restarts;
        self
    }

    /// Moves to the next step, dropping any outstanding prompt binding.
    pub fn advance(&mut self) {
        self.step += 1;
        self.awaiting = None;
    }

    /// Returns true if the frame is suspended on a prompt.
    pub fn is_waiting(&self) -> bool {
        self.awaiting.is_some()
    }
}

/// Ordered collection of active flow invocations. Only the top is live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogStack {
    frames: Vec<DialogFrame>,
}

impl DialogStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when no flow is active.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn top(&self) -> Option<&DialogFrame> {
        self.frames.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut DialogFrame> {
        self.frames.last_mut()
    }

    pub fn push(&mut self, frame: DialogFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<DialogFrame> {
        self.frames.pop()
    }

    /// Pops the top frame and pushes `frame` in its place.
    pub fn replace_top(&mut self, frame: DialogFrame) -> Option<DialogFrame> {
        let previous = self.frames.pop();
        self.frames.push(frame);
        previous
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Frames from bottom to top.
    pub fn frames(&self) -> &[DialogFrame] {
        &self.frames
    }

    /// Name of the active flow, if any.
    pub fn active_flow(&self) -> Option<&FlowName> {
        self.top().map(|frame| &frame.flow)
    }
}
