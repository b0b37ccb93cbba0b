//! Card Renderer Port - Interface for rich reply templates.
//!
//! Steps and the orchestrator request a named template and a set of values;
//! the adapter returns a ready-to-send attachment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::conversation::Attachment;

/// Templates the conversation engine knows how to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardTemplate {
    /// Greeting shown when the bot joins a conversation. No parameters.
    Welcome,
    /// Summary of a completed booking.
    BookingDetails,
}

impl CardTemplate {
    pub const ALL: [CardTemplate; 2] = [Self::Welcome, Self::BookingDetails];

    /// Template file stem and registry name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::BookingDetails => "booking_details",
        }
    }

    /// Placeholders the template expects to be filled.
    pub fn placeholders(&self) -> &'static [&'static str] {
        match self {
            Self::Welcome => &[],
            Self::BookingDetails => &["employee_id", "facility_type", "floor", "date"],
        }
    }
}

impl fmt::Display for CardTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Placeholder values keyed by placeholder name.
pub type CardValues = BTreeMap<String, String>;

/// Port for rendering card templates.
pub trait CardRenderer: Send + Sync {
    /// Render `template` with `values` substituted for its placeholders.
    ///
    /// # Errors
    /// Returns `RenderError` if the template is unavailable or malformed.
    fn render(&self, template: CardTemplate, values: &CardValues) -> Result<Attachment, RenderError>;
}

/// Errors raised while rendering cards.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("Template not found: {0}")]
    TemplateNotFound(CardTemplate),

    #[error("Template {template} is not valid JSON: {reason}")]
    InvalidTemplate {
        template: CardTemplate,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(String),
}
