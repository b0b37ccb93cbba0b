//! Foundation module - Shared domain primitives.
//!
//! Identifiers and error types that form the vocabulary of the
//! concierge domain.

mod errors;
mod ids;

pub use errors::ValidationError;
pub use ids::{ConversationKey, ReplyId};
