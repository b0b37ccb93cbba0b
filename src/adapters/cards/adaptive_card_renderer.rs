//! Adaptive Card Renderer - Implementation of CardRenderer.
//!
//! Templates are adaptive card JSON documents with `{{name}}` placeholders
//! inside string values. Substitution happens on the parsed document, so
//! user-supplied values can never break the JSON structure.
//!
//! Templates come either from a directory (`welcome.json`,
//! `booking_details.json`) or from the copies embedded at build time.

use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

use crate::domain::conversation::Attachment;
use crate::ports::{CardRenderer, CardTemplate, CardValues, RenderError};

const EMBEDDED_WELCOME: &str = include_str!("../../../cards/welcome.json");
const EMBEDDED_BOOKING_DETAILS: &str = include_str!("../../../cards/booking_details.json");

/// Renders adaptive cards from parsed JSON templates.
#[derive(Debug, Clone)]
pub struct AdaptiveCardRenderer {
    templates: HashMap<CardTemplate, Value>,
}

impl AdaptiveCardRenderer {
    /// Uses the templates bundled with the crate.
    ///
    /// # Errors
    /// Returns `RenderError::InvalidTemplate` if a bundled template is not
    /// valid JSON.
    pub fn embedded() -> Result<Self, RenderError> {
        let mut templates = HashMap::new();
        for template in CardTemplate::ALL {
            let source = match template {
                CardTemplate::Welcome => EMBEDDED_WELCOME,
                CardTemplate::BookingDetails => EMBEDDED_BOOKING_DETAILS,
            };
            templates.insert(template, parse_template(template, source)?);
        }
        Ok(Self { templates })
    }

    /// Loads `{template}.json` for every known template from `dir`.
    ///
    /// # Errors
    /// Returns `RenderError::TemplateNotFound` for a missing file,
    /// `RenderError::Io` for other read failures, and
    /// `RenderError::InvalidTemplate` for malformed JSON.
    pub async fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, RenderError> {
        let mut templates = HashMap::new();
        for template in CardTemplate::ALL {
            let path = dir.as_ref().join(format!("{}.json", template.name()));
            let source = fs::read_to_string(&path).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RenderError::TemplateNotFound(template)
                } else {
                    RenderError::Io(format!("{}: {}", path.display(), e))
                }
            })?;
            templates.insert(template, parse_template(template, &source)?);
        }
        Ok(Self { templates })
    }
}

fn parse_template(template: CardTemplate, source: &str) -> Result<Value, RenderError> {
    serde_json::from_str(source).map_err(|e| RenderError::InvalidTemplate {
        template,
        reason: e.to_string(),
    })
}

/// Replaces `{{name}}` markers in every string value of `value`.
fn substitute(value: &mut Value, replacements: &[(&str, &str)]) {
    match value {
        Value::String(text) => {
            if text.contains("{{") {
                *text = fill_placeholders(text, replacements);
            }
        }
        Value::Array(items) => {
            for item in items {
                substitute(item, replacements);
            }
        }
        Value::Object(map) => {
            for (_, item) in map.iter_mut() {
                substitute(item, replacements);
            }
        }
        _ => {}
    }
}

/// Single left-to-right pass. Inserted values are never rescanned, and
/// markers without a replacement are kept as written.
fn fill_placeholders(text: &str, replacements: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match replacements.iter().find(|(marker, _)| *marker == name) {
            Some((_, replacement)) => out.push_str(replacement),
            None => {
                out.push_str("{{");
                out.push_str(name);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

impl CardRenderer for AdaptiveCardRenderer {
    fn render(&self, template: CardTemplate, values: &CardValues) -> Result<Attachment, RenderError> {
        let mut content = self
            .templates
            .get(&template)
            .cloned()
            .ok_or(RenderError::TemplateNotFound(template))?;

        // Declared placeholders without a value render empty
        let replacements: Vec<(&str, &str)> = template
            .placeholders()
            .iter()
            .map(|name| {
                let value = values.get(*name).map(String::as_str).unwrap_or_default();
                (*name, value)
            })
            .collect();
        substitute(&mut content, &replacements);

        Ok(Attachment::adaptive_card(content))
    }
}
