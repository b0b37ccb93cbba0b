//! End-to-end conversations through the turn handler.
//!
//! Each test drives a full multi-turn exchange with a scripted classifier,
//! the bundled card templates and the fixed employee directory:
//! - `234567` may book anything
//! - `123456` is an employee without office space and with no free floor
//! - `345678` is inactive
//! - anything else is unknown

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;

use facility_concierge::adapters::{
    AdaptiveCardRenderer, InMemorySessionStore, MockIntentClassifier,
};
use facility_concierge::application::flows::prompts;
use facility_concierge::application::{facility_engine, HandleTurnCommand, TurnHandler};
use facility_concierge::domain::conversation::{Activity, ChannelAccount, Intent, IntentResult, Reply};
use facility_concierge::domain::dialog::FlowName;
use facility_concierge::domain::foundation::ConversationKey;
use facility_concierge::domain::slots::SlotField;
use facility_concierge::domain::validation::StaticDirectory;
use facility_concierge::ports::{ClassifierError, SessionStore};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Harness {
    handler: Arc<TurnHandler>,
    store: InMemorySessionStore,
    classifier: MockIntentClassifier,
}

impl Harness {
    fn new(classifier: MockIntentClassifier) -> Self {
        let store = InMemorySessionStore::new();
        let renderer = Arc::new(AdaptiveCardRenderer::embedded().unwrap());
        let engine = facility_engine(Arc::new(StaticDirectory::new()), renderer.clone());
        let handler = TurnHandler::new(
            Arc::new(engine),
            Arc::new(classifier.clone()),
            Arc::new(store.clone()),
            renderer,
        );
        Self {
            handler: Arc::new(handler),
            store,
            classifier,
        }
    }

    async fn say(&self, text: &str) -> Vec<Reply> {
        self.handler
            .handle(HandleTurnCommand::new(key(), Activity::message(text)))
            .await
    }

    async fn say_texts(&self, text: &str) -> Vec<String> {
        self.say(text)
            .await
            .iter()
            .filter_map(|r| r.as_text().map(str::to_string))
            .collect()
    }

    async fn slot(&self, field: SlotField) -> String {
        self.store
            .load(&key())
            .await
            .unwrap()
            .map(|s| s.slots.value(field).to_string())
            .unwrap_or_default()
    }

    async fn active_flow(&self) -> Option<FlowName> {
        self.store
            .load(&key())
            .await
            .unwrap()
            .and_then(|s| s.stack.active_flow().cloned())
    }
}

fn key() -> ConversationKey {
    ConversationKey::new("integration-conv").unwrap()
}

fn booking(facility_type: &str) -> IntentResult {
    IntentResult::new(Intent::BookFacilities).with_entity(SlotField::FacilityType, facility_type)
}

fn card_text(reply: &Reply) -> String {
    reply
        .as_card()
        .map(|card| card.content.to_string())
        .unwrap_or_default()
}

// =============================================================================
// Booking
// =============================================================================

#[tokio::test]
async fn senior_executive_books_office_space_end_to_end() {
    let h = Harness::new(MockIntentClassifier::new().with_result(booking("office space")));

    assert_eq!(h.say_texts("book office space").await, vec![prompts::ASK_EMPLOYEE_ID]);
    assert_eq!(h.say_texts("234567").await, vec![prompts::ASK_DATE]);
    assert_eq!(h.say_texts("tomorrow").await, vec![prompts::ASK_FLOOR]);

    let replies = h.say("3").await;
    assert_eq!(replies.len(), 1);
    let card = card_text(&replies[0]);
    assert!(card.contains("234567"));
    assert!(card.contains("office space"));
    assert!(card.contains("tomorrow"));

    assert_eq!(h.active_flow().await, None);
    assert_eq!(h.classifier.call_count(), 1);
}

#[tokio::test]
async fn entities_from_the_utterance_skip_their_prompts() {
    let result = booking("cubicle")
        .with_entity(SlotField::EmployeeId, "234567")
        .with_entity(SlotField::Date, "friday");
    let h = Harness::new(MockIntentClassifier::new().with_result(result));

    assert_eq!(h.say_texts("book a cubicle friday for 234567").await, vec![prompts::ASK_FLOOR]);
    assert_eq!(h.slot(SlotField::Date).await, "friday");
}

#[tokio::test]
async fn unknown_employee_is_asked_again_with_other_slots_kept() {
    let h = Harness::new(MockIntentClassifier::new().with_result(booking("cubicle")));
    h.say("book a cubicle").await;

    let texts = h.say_texts("000000").await;

    assert_eq!(texts, vec![prompts::EMPLOYEE_ID_INCORRECT, prompts::ASK_EMPLOYEE_ID]);
    assert_eq!(h.slot(SlotField::EmployeeId).await, "");
    assert_eq!(h.slot(SlotField::FacilityType).await, "cubicle");
    assert_eq!(h.active_flow().await, Some(FlowName::BOOKING));
}

#[tokio::test]
async fn inactive_employee_is_rejected() {
    let h = Harness::new(MockIntentClassifier::new().with_result(booking("cubicle")));
    h.say("book a cubicle").await;

    let texts = h.say_texts("345678").await;

    assert_eq!(texts[0], prompts::EMPLOYEE_ID_INCORRECT);
}

#[tokio::test]
async fn restricted_employee_is_offered_a_cubicle_and_accepts() {
    let h = Harness::new(MockIntentClassifier::new().with_result(booking("office space")));
    h.say("book office space").await;

    let texts = h.say_texts("123456").await;
    assert_eq!(texts, vec![prompts::OFFICE_SPACE_RESTRICTED, prompts::YES_NO]);
    assert_eq!(h.slot(SlotField::FacilityType).await, "");
    assert_eq!(h.active_flow().await, Some(FlowName::YES_NO));

    // Consent starts a fresh booking with every entity cleared
    assert_eq!(h.say_texts("yes").await, vec![prompts::ASK_FACILITY_TYPE]);
    assert_eq!(h.slot(SlotField::EmployeeId).await, "");
    assert_eq!(h.active_flow().await, Some(FlowName::BOOKING));
}

#[tokio::test]
async fn declining_the_alternative_ends_the_dialog() {
    let h = Harness::new(MockIntentClassifier::new().with_result(booking("office space")));
    h.say("book office space").await;
    h.say("123456").await;

    let texts = h.say_texts("no thanks").await;

    assert_eq!(texts, vec![prompts::ANYTHING_ELSE_AFTER_DECLINE]);
    assert_eq!(h.active_flow().await, None);
}

#[tokio::test]
async fn consent_must_be_exactly_yes() {
    let h = Harness::new(MockIntentClassifier::new().with_result(booking("office space")));
    h.say("book office space").await;
    h.say("123456").await;

    let texts = h.say_texts("Yes please").await;

    assert_eq!(texts, vec![prompts::ANYTHING_ELSE_AFTER_DECLINE]);
}

#[tokio::test]
async fn unavailable_floor_is_explained_with_the_facility_type() {
    let h = Harness::new(MockIntentClassifier::new().with_result(booking("cubicle")));
    h.say("book a cubicle").await;
    h.say("123456").await;
    h.say("monday").await;

    let texts = h.say_texts("7").await;

    assert_eq!(texts, vec![prompts::floor_unavailable("cubicle"), prompts::YES_NO.to_string()]);
    assert_eq!(h.slot(SlotField::Floor).await, "");
    assert_eq!(h.slot(SlotField::Date).await, "monday");
}

// =============================================================================
// Dispatch
// =============================================================================

#[tokio::test]
async fn navigation_announces_location() {
    let result = IntentResult::new(Intent::NavigateFacilities)
        .with_entity(SlotField::FacilityId, "cafeteria");
    let h = Harness::new(MockIntentClassifier::new().with_result(result));

    let texts = h.say_texts("where is the cafeteria").await;

    assert_eq!(texts, vec![prompts::location_of("cafeteria")]);
    assert_eq!(h.active_flow().await, None);
}

#[tokio::test]
async fn navigation_without_target_asks_for_it() {
    let h = Harness::new(
        MockIntentClassifier::new().with_result(IntentResult::new(Intent::NavigateFacilities)),
    );

    assert_eq!(h.say_texts("navigate me").await, vec![prompts::ASK_DESTINATION]);
    assert_eq!(h.say_texts("gym").await, vec![prompts::location_of("gym")]);
}

#[tokio::test]
async fn unrecognized_text_gets_fallback() {
    let h = Harness::new(MockIntentClassifier::new());

    assert_eq!(h.say_texts("purple monkey").await, vec![prompts::DID_NOT_UNDERSTAND]);
}

#[tokio::test]
async fn classifier_failure_degrades_to_fallback() {
    let h = Harness::new(MockIntentClassifier::new().with_error(ClassifierError::Timeout));

    assert_eq!(h.say_texts("book").await, vec![prompts::DID_NOT_UNDERSTAND]);
    assert_eq!(h.store.session_count().await, 1);
}

#[tokio::test]
async fn end_conversation_offers_more_help() {
    let h = Harness::new(
        MockIntentClassifier::new().with_result(IntentResult::new(Intent::EndConversation)),
    );

    assert_eq!(h.say_texts("bye").await, vec![prompts::ANYTHING_ELSE]);
}

#[tokio::test]
async fn welcome_intent_sends_card() {
    let h = Harness::new(MockIntentClassifier::new().with_result(IntentResult::new(Intent::Welcome)));

    let replies = h.say("hello").await;

    assert_eq!(replies.len(), 1);
    assert!(replies[0].as_card().is_some());
}

#[tokio::test]
async fn answers_during_a_dialog_are_not_classified() {
    let h = Harness::new(MockIntentClassifier::new().with_result(booking("cubicle")));
    h.say("book a cubicle").await;
    h.say("234567").await;
    h.say("today").await;

    assert_eq!(h.classifier.calls(), vec!["book a cubicle".to_string()]);
}

#[tokio::test]
async fn bot_joining_is_welcomed() {
    let h = Harness::new(MockIntentClassifier::new());
    let bot = ChannelAccount::new("bot");
    let cmd = HandleTurnCommand::new(key(), Activity::conversation_update(bot.clone(), vec![bot]));

    let replies = h.handler.handle(cmd).await;

    assert_eq!(replies.len(), 1);
    assert!(replies[0].as_card().is_some());
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn concurrent_turns_for_one_conversation_are_serialized() {
    let classifier = MockIntentClassifier::new().with_delay(Duration::from_millis(20));
    let h = Harness::new(classifier);

    let turns = (0..4).map(|i| {
        let handler = Arc::clone(&h.handler);
        tokio::spawn(async move {
            handler
                .handle(HandleTurnCommand::new(key(), Activity::message(format!("hi {}", i))))
                .await
        })
    });
    for turn in turns.collect::<Vec<_>>() {
        turn.await.unwrap();
    }

    let session = h.store.load(&key()).await.unwrap().unwrap();
    assert_eq!(session.turn_count, 4);
}

// =============================================================================
// Properties
// =============================================================================

const BOOKING_ORDER: [(SlotField, &str); 4] = [
    (SlotField::FacilityType, prompts::ASK_FACILITY_TYPE),
    (SlotField::EmployeeId, prompts::ASK_EMPLOYEE_ID),
    (SlotField::Date, prompts::ASK_DATE),
    (SlotField::Floor, prompts::ASK_FLOOR),
];

const SEEDS: [&str; 4] = ["cubicle", "234567", "tomorrow", "2"];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Filled slots are never asked for: the first prompt is for the first
    /// empty slot, and a fully seeded booking completes at once.
    #[test]
    fn first_prompt_is_first_empty_slot(filled in prop::array::uniform4(any::<bool>())) {
        let mut result = IntentResult::new(Intent::BookFacilities);
        for (i, (field, _)) in BOOKING_ORDER.iter().enumerate() {
            if filled[i] {
                result = result.with_entity(*field, SEEDS[i]);
            }
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let replies = runtime.block_on(async {
            let h = Harness::new(MockIntentClassifier::new().with_result(result));
            h.say("book").await
        });

        prop_assert_eq!(replies.len(), 1);
        match BOOKING_ORDER.iter().enumerate().find(|(i, _)| !filled[*i]) {
            Some((_, (_, prompt))) => prop_assert_eq!(replies[0].as_text(), Some(*prompt)),
            None => prop_assert!(replies[0].as_card().is_some()),
        }
    }
}
