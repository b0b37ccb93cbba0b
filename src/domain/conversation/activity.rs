//! Inbound activities and outbound replies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::ReplyId;

/// Key under which rich clients place the turn text in a structured value.
pub const VALUE_TEXT_KEY: &str = "x";

/// Content type of rendered adaptive cards.
pub const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";

/// Kind of inbound activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Message,
    ConversationUpdate,
    Other(String),
}

/// A participant in the channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAccount {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChannelAccount {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

/// One inbound turn as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub kind: ActivityKind,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub recipient: Option<ChannelAccount>,
    #[serde(default)]
    pub members_added: Vec<ChannelAccount>,
}

impl Activity {
    /// A plain text message.
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            kind: ActivityKind::Message,
            text: Some(text.into()),
            value: None,
            recipient: None,
            members_added: Vec::new(),
        }
    }

    /// A message carrying a structured value (card submit, quick reply).
    pub fn message_value(value: Value) -> Self {
        Self {
            kind: ActivityKind::Message,
            text: None,
            value: Some(value),
            recipient: None,
            members_added: Vec::new(),
        }
    }

    /// A membership change notification.
    pub fn conversation_update(recipient: ChannelAccount, members_added: Vec<ChannelAccount>) -> Self {
        Self {
            kind: ActivityKind::ConversationUpdate,
            text: None,
            value: None,
            recipient: Some(recipient),
            members_added,
        }
    }

    /// Attaches a plain text field.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Resolves the user's text for this turn.
    ///
    /// Tries the structured value's `x` key first, then the plain text,
    /// then the structured value rendered as text.
    pub fn turn_text(&self) -> Option<String> {
        if let Some(text) = self
            .value
            .as_ref()
            .and_then(|value| value.get(VALUE_TEXT_KEY))
            .and_then(Value::as_str)
        {
            return Some(text.to_string());
        }
        if let Some(text) = &self.text {
            return Some(text.clone());
        }
        self.value.as_ref().map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Returns true if this update announces the recipient (the bot) joining.
    pub fn recipient_was_added(&self) -> bool {
        match (&self.recipient, self.members_added.first()) {
            (Some(recipient), Some(first)) => first.id == recipient.id,
            _ => false,
        }
    }
}

/// A rendered rich attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub content_type: String,
    pub content: Value,
}

impl Attachment {
    /// Wraps adaptive card JSON.
    pub fn adaptive_card(content: Value) -> Self {
        Self {
            content_type: ADAPTIVE_CARD_CONTENT_TYPE.to_string(),
            content,
        }
    }
}

/// Payload of an outgoing reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplyContent {
    Text { text: String },
    Card { attachment: Attachment },
}

/// One outgoing message produced during a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub id: ReplyId,
    pub content: ReplyContent,
    pub created_at: DateTime<Utc>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::with_content(ReplyContent::Text { text: text.into() })
    }

    pub fn card(attachment: Attachment) -> Self {
        Self::with_content(ReplyContent::Card { attachment })
    }

    fn with_content(content: ReplyContent) -> Self {
        Self {
            id: ReplyId::new(),
            content,
            created_at: Utc::now(),
        }
    }

    /// The text of a text reply.
    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            ReplyContent::Text { text } => Some(text),
            ReplyContent::Card { .. } => None,
        }
    }

    /// The attachment of a card reply.
    pub fn as_card(&self) -> Option<&Attachment> {
        match &self.content {
            ReplyContent::Card { attachment } => Some(attachment),
            ReplyContent::Text { .. } => None,
        }
    }
}
