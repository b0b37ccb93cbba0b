//! Session Entity
//!
//! Per-conversation state carried between turns: the collected slots and the
//! active dialog stack.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::dialog::DialogStack;
use crate::domain::foundation::ConversationKey;
use crate::domain::slots::SlotState;

/// Everything the engine needs to resume a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub key: ConversationKey,
    #[serde(default)]
    pub slots: SlotState,
    #[serde(default)]
    pub stack: DialogStack,
    /// Number of completed turns.
    #[serde(default)]
    pub turn_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create an empty session for a first turn.
    pub fn new(key: ConversationKey) -> Self {
        let now = Utc::now();
        Self {
            key,
            slots: SlotState::new(),
            stack: DialogStack::new(),
            turn_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if a flow is waiting for the next turn.
    pub fn has_active_dialog(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Record a completed turn.
    pub fn touch(&mut self) {
        self.turn_count += 1;
        self.updated_at = Utc::now();
    }
}
