//! Keyword Classifier - Offline implementation of IntentClassifier.
//!
//! Rule-based matching over lowercase text. Good enough for local
//! development and scripted tests without a LUIS app.

use async_trait::async_trait;

use crate::domain::conversation::{Intent, IntentResult};
use crate::domain::slots::SlotField;
use crate::ports::{ClassifierError, IntentClassifier};

/// Facility types recognized in free text, longest phrase first.
const FACILITY_TYPES: [&str; 5] = [
    "office space",
    "meeting room",
    "conference room",
    "parking",
    "cubicle",
];

const DATE_WORDS: [&str; 9] = [
    "today",
    "tomorrow",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Simple rule-based intent classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordIntentClassifier;

impl KeywordIntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Pure classification used by the async trait implementation.
    pub fn classify_text(&self, text: &str) -> IntentResult {
        let lowercase = text.to_lowercase();

        // Navigation before booking: "where is room 12" also mentions a room
        let intent = if contains_any(&lowercase, &["where is", "navigate", "directions", "take me to"]) {
            Intent::NavigateFacilities
        } else if contains_any(&lowercase, &["book", "reserve"]) {
            Intent::BookFacilities
        } else if contains_any(&lowercase, &["bye", "thanks", "thank you", "that's all"]) {
            Intent::EndConversation
        } else if contains_any(&lowercase, &["hello", "hi ", "hey", "help"]) || lowercase.trim() == "hi" {
            Intent::Welcome
        } else {
            Intent::None
        };

        let mut result = IntentResult::new(intent.clone());

        if let Some(facility) = FACILITY_TYPES.iter().find(|f| lowercase.contains(*f)) {
            result = result.with_entity(SlotField::FacilityType, *facility);
        }
        if let Some(id) = employee_id(&lowercase) {
            result = result.with_entity(SlotField::EmployeeId, id);
        }
        if let Some(floor) = floor(&lowercase) {
            result = result.with_entity(SlotField::Floor, floor);
        }
        if let Some(date) = DATE_WORDS
            .iter()
            .find(|d| lowercase.split_whitespace().any(|word| word.trim_matches(|c: char| !c.is_alphanumeric()) == **d))
        {
            result = result.with_entity(SlotField::Date, *date);
        }
        if intent == Intent::NavigateFacilities {
            if let Some(target) = navigation_target(&lowercase) {
                result = result.with_entity(SlotField::FacilityId, target);
            }
        }

        result
    }
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty())
}

/// First standalone six-digit number.
fn employee_id(text: &str) -> Option<&str> {
    words(text).find(|w| w.len() == 6 && w.chars().all(|c| c.is_ascii_digit()))
}

/// Number following the word "floor", e.g. "floor 4".
fn floor(text: &str) -> Option<&str> {
    let mut iter = words(text).peekable();
    while let Some(word) = iter.next() {
        if word == "floor" {
            return iter.peek().copied().filter(|w| w.chars().all(|c| c.is_ascii_digit()));
        }
    }
    None
}

/// Everything after the navigation phrase, e.g. "where is room 12" → "room 12".
fn navigation_target(text: &str) -> Option<String> {
    ["where is", "navigate to", "directions to", "take me to"]
        .iter()
        .find_map(|phrase| text.find(phrase).map(|idx| &text[idx + phrase.len()..]))
        .map(|rest| rest.trim().trim_end_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|target| !target.is_empty())
}

#[async_trait]
impl IntentClassifier for KeywordIntentClassifier {
    async fn classify(&self, text: &str) -> Result<IntentResult, ClassifierError> {
        Ok(self.classify_text(text))
    }
}
