//! Conversation domain module.
//!
//! Inbound activities, outbound replies, classified intents, and the
//! per-conversation session record.

mod activity;
mod intent;
mod session;

pub use activity::{
    Activity, ActivityKind, Attachment, ChannelAccount, Reply, ReplyContent,
    ADAPTIVE_CARD_CONTENT_TYPE, VALUE_TEXT_KEY,
};
pub use intent::{Intent, IntentResult};
pub use session::Session;
