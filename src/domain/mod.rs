//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (identifiers, validation errors)
//! - `slots` - Collected field values and the slot catalogue
//! - `validation` - Employee validity and availability checks
//! - `conversation` - Activities, replies, intents, and the session record
//! - `dialog` - Waterfall flows, the dialog stack, and the step engine

pub mod conversation;
pub mod dialog;
pub mod foundation;
pub mod slots;
pub mod validation;
