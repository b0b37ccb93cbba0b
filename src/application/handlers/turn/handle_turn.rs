//! TurnHandler - Process one inbound activity for a conversation.
//!
//! Loads the session, resumes the active dialog or classifies the text and
//! begins the matching flow, then saves the session. All mutations happen on
//! a working copy that is saved last, so a failed or abandoned turn leaves
//! the stored session exactly as it was.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::application::flows::prompts;
use crate::domain::conversation::{Activity, ActivityKind, Intent, IntentResult, Reply, Session};
use crate::domain::dialog::{
    DialogContext, DialogError, DialogTurnStatus, FlowName, FlowOptions, WaterfallEngine,
};
use crate::domain::foundation::ConversationKey;
use crate::ports::{
    CardRenderer, CardTemplate, CardValues, IntentClassifier, RenderError, SessionStore,
    SessionStoreError,
};

use super::keyed_locks::KeyedLocks;

/// Default bound on a single turn.
pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(30);

/// Command to process one inbound activity
#[derive(Debug, Clone)]
pub struct HandleTurnCommand {
    pub conversation: ConversationKey,
    pub activity: Activity,
}

impl HandleTurnCommand {
    pub fn new(conversation: ConversationKey, activity: Activity) -> Self {
        Self {
            conversation,
            activity,
        }
    }
}

/// Error type for turn processing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    /// Session store failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Dialog engine failed
    #[error("Dialog error: {0}")]
    Dialog(#[from] DialogError),

    /// Card rendering outside a step failed
    #[error("Render error: {0}")]
    Render(String),

    /// Turn exceeded its time budget
    #[error("Turn timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl From<SessionStoreError> for TurnError {
    fn from(err: SessionStoreError) -> Self {
        TurnError::Storage(err.to_string())
    }
}

impl From<RenderError> for TurnError {
    fn from(err: RenderError) -> Self {
        TurnError::Render(err.to_string())
    }
}

/// Conversation orchestrator: the entry point for every inbound turn.
pub struct TurnHandler {
    engine: Arc<WaterfallEngine>,
    classifier: Arc<dyn IntentClassifier>,
    store: Arc<dyn SessionStore>,
    renderer: Arc<dyn CardRenderer>,
    locks: KeyedLocks,
    turn_timeout: Duration,
}

impl TurnHandler {
    pub fn new(
        engine: Arc<WaterfallEngine>,
        classifier: Arc<dyn IntentClassifier>,
        store: Arc<dyn SessionStore>,
        renderer: Arc<dyn CardRenderer>,
    ) -> Self {
        Self {
            engine,
            classifier,
            store,
            renderer,
            locks: KeyedLocks::new(),
            turn_timeout: DEFAULT_TURN_TIMEOUT,
        }
    }

    /// Sets the time budget of a single turn.
    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = timeout;
        self
    }

    /// Process a turn, swallowing failures.
    ///
    /// Any error is logged and the turn produces no replies.
    pub async fn handle(&self, cmd: HandleTurnCommand) -> Vec<Reply> {
        let conversation = cmd.conversation.clone();
        match self.try_handle(cmd).await {
            Ok(replies) => replies,
            Err(err) => {
                error!(conversation = %conversation, error = %err, "Turn failed");
                Vec::new()
            }
        }
    }

    /// Process a turn, reporting failures to the caller.
    ///
    /// Turns for the same conversation run one at a time; the time budget
    /// starts once the turn holds its conversation lock.
    ///
    /// # Errors
    /// Returns `TurnError` if the store, the engine or the welcome card
    /// fails, or the turn exceeds its time budget. The stored session is
    /// unchanged in every error case.
    pub async fn try_handle(&self, cmd: HandleTurnCommand) -> Result<Vec<Reply>, TurnError> {
        let _permit = self.locks.acquire(&cmd.conversation).await;

        tokio::time::timeout(self.turn_timeout, self.run_turn(cmd))
            .await
            .map_err(|_| TurnError::Timeout {
                timeout_secs: self.turn_timeout.as_secs(),
            })?
    }

    async fn run_turn(&self, cmd: HandleTurnCommand) -> Result<Vec<Reply>, TurnError> {
        let HandleTurnCommand {
            conversation,
            activity,
        } = cmd;

        match &activity.kind {
            ActivityKind::Message => {}
            ActivityKind::ConversationUpdate => {
                if activity.recipient_was_added() {
                    info!(conversation = %conversation, "Bot joined conversation");
                    return Ok(vec![self.welcome_card()?]);
                }
                return Ok(Vec::new());
            }
            ActivityKind::Other(kind) => {
                debug!(conversation = %conversation, kind = %kind, "Ignoring activity");
                return Ok(Vec::new());
            }
        }

        let text = activity.turn_text().unwrap_or_default();
        let mut session = self
            .store
            .load(&conversation)
            .await?
            .unwrap_or_else(|| Session::new(conversation.clone()));

        let mut replies = Vec::new();
        {
            let mut ctx = DialogContext::new(&mut session.stack, &mut session.slots, &mut replies);

            let mut status = self.engine.resume(&mut ctx, &text).await?;
            if ctx.replies.is_empty() && ctx.stack.is_empty() {
                status = self.dispatch(&conversation, &mut ctx, &text).await?;
            }
            if status == DialogTurnStatus::Cancelled {
                self.engine.cancel_all(&mut ctx);
            }
        }

        session.touch();
        self.store.save(&conversation, &session).await?;

        debug!(
            conversation = %conversation,
            turn = session.turn_count,
            depth = session.stack.depth(),
            active = session.has_active_dialog(),
            slots = session.slots.filled_count(),
            replies = replies.len(),
            "Turn complete"
        );
        Ok(replies)
    }

    /// Classifies the text and starts whatever the intent calls for.
    async fn dispatch(
        &self,
        conversation: &ConversationKey,
        ctx: &mut DialogContext<'_>,
        text: &str,
    ) -> Result<DialogTurnStatus, TurnError> {
        let result = match self.classifier.classify(text).await {
            Ok(result) => result,
            Err(err) => {
                warn!(conversation = %conversation, error = %err, "Classification failed, treating as none");
                IntentResult::none()
            }
        };
        info!(conversation = %conversation, intent = %result.intent, "Dispatching intent");

        let status = match result.intent.clone() {
            Intent::None => {
                ctx.replies.push(Reply::text(prompts::DID_NOT_UNDERSTAND));
                DialogTurnStatus::Empty
            }
            Intent::Welcome => {
                ctx.replies.push(self.welcome_card()?);
                DialogTurnStatus::Empty
            }
            Intent::BookFacilities => {
                self.engine
                    .begin(ctx, FlowName::BOOKING, FlowOptions::Seed(result))
                    .await?
            }
            Intent::NavigateFacilities => {
                self.engine
                    .begin(ctx, FlowName::NAVIGATION, FlowOptions::Seed(result))
                    .await?
            }
            Intent::EndConversation => {
                ctx.replies.push(Reply::text(prompts::ANYTHING_ELSE));
                DialogTurnStatus::Empty
            }
            Intent::Other(label) => {
                debug!(conversation = %conversation, intent = %label, "No handler for intent");
                DialogTurnStatus::Empty
            }
        };
        Ok(status)
    }

    fn welcome_card(&self) -> Result<Reply, TurnError> {
        let card = self.renderer.render(CardTemplate::Welcome, &CardValues::new())?;
        Ok(Reply::card(card))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{AdaptiveCardRenderer, InMemorySessionStore, MockIntentClassifier};
    use crate::application::flows::facility_engine;
    use crate::domain::conversation::ChannelAccount;
    use crate::domain::slots::SlotField;
    use crate::domain::validation::StaticDirectory;
    use crate::ports::ClassifierError;
    use async_trait::async_trait;

    struct Fixture {
        handler: TurnHandler,
        store: InMemorySessionStore,
        classifier: MockIntentClassifier,
    }

    fn fixture(classifier: MockIntentClassifier) -> Fixture {
        let store = InMemorySessionStore::new();
        let renderer = Arc::new(AdaptiveCardRenderer::embedded().unwrap());
        let engine = facility_engine(Arc::new(StaticDirectory::new()), renderer.clone());
        let handler = TurnHandler::new(
            Arc::new(engine),
            Arc::new(classifier.clone()),
            Arc::new(store.clone()),
            renderer,
        );
        Fixture {
            handler,
            store,
            classifier,
        }
    }

    fn key() -> ConversationKey {
        ConversationKey::new("conv-1").unwrap()
    }

    fn message(text: &str) -> HandleTurnCommand {
        HandleTurnCommand::new(key(), Activity::message(text))
    }

    fn texts(replies: &[Reply]) -> Vec<&str> {
        replies.iter().filter_map(Reply::as_text).collect()
    }

    struct BrokenStore;

    #[async_trait]
    impl SessionStore for BrokenStore {
        async fn load(&self, _key: &ConversationKey) -> Result<Option<Session>, SessionStoreError> {
            Err(SessionStoreError::Backend("connection refused".to_string()))
        }

        async fn save(&self, _key: &ConversationKey, _session: &Session) -> Result<(), SessionStoreError> {
            Err(SessionStoreError::Backend("connection refused".to_string()))
        }

        async fn delete(&self, _key: &ConversationKey) -> Result<(), SessionStoreError> {
            Ok(())
        }
    }

    mod conversation_updates {
        use super::*;

        #[tokio::test]
        async fn bot_joining_gets_welcome_card_and_nothing_is_saved() {
            let f = fixture(MockIntentClassifier::new());
            let bot = ChannelAccount::new("bot");
            let cmd = HandleTurnCommand::new(key(), Activity::conversation_update(bot.clone(), vec![bot]));

            let replies = f.handler.handle(cmd).await;

            assert_eq!(replies.len(), 1);
            assert!(replies[0].as_card().is_some());
            assert_eq!(f.store.session_count().await, 0);
            assert_eq!(f.classifier.call_count(), 0);
        }

        #[tokio::test]
        async fn other_members_joining_is_ignored() {
            let f = fixture(MockIntentClassifier::new());
            let cmd = HandleTurnCommand::new(
                key(),
                Activity::conversation_update(ChannelAccount::new("bot"), vec![ChannelAccount::new("user")]),
            );

            assert!(f.handler.handle(cmd).await.is_empty());
        }

        #[tokio::test]
        async fn unknown_activity_kinds_are_ignored() {
            let f = fixture(MockIntentClassifier::new());
            let mut activity = Activity::message("hello");
            activity.kind = ActivityKind::Other("typing".to_string());

            assert!(f.handler.handle(HandleTurnCommand::new(key(), activity)).await.is_empty());
            assert_eq!(f.classifier.call_count(), 0);
        }
    }

    mod dispatch {
        use super::*;

        #[tokio::test]
        async fn none_intent_apologizes() {
            let f = fixture(MockIntentClassifier::new().with_result(IntentResult::none()));
            let replies = f.handler.handle(message("blah")).await;
            assert_eq!(texts(&replies), vec![prompts::DID_NOT_UNDERSTAND]);
        }

        #[tokio::test]
        async fn classifier_failure_degrades_to_none() {
            let f = fixture(MockIntentClassifier::new().with_error(ClassifierError::Timeout));
            let replies = f.handler.handle(message("book")).await;
            assert_eq!(texts(&replies), vec![prompts::DID_NOT_UNDERSTAND]);
        }

        #[tokio::test]
        async fn welcome_intent_sends_card() {
            let f = fixture(MockIntentClassifier::new().with_result(IntentResult::new(Intent::Welcome)));
            let replies = f.handler.handle(message("hi")).await;
            assert_eq!(replies.len(), 1);
            assert!(replies[0].as_card().is_some());
        }

        #[tokio::test]
        async fn end_conversation_intent_replies() {
            let f = fixture(
                MockIntentClassifier::new().with_result(IntentResult::new(Intent::EndConversation)),
            );
            let replies = f.handler.handle(message("bye")).await;
            assert_eq!(texts(&replies), vec![prompts::ANYTHING_ELSE]);
        }

        #[tokio::test]
        async fn unknown_intent_is_silent_and_leaves_stack_empty() {
            let f = fixture(
                MockIntentClassifier::new().with_result(IntentResult::new(Intent::from_label("cancelBooking"))),
            );
            let replies = f.handler.handle(message("cancel")).await;
            assert!(replies.is_empty());
            let session = f.store.load(&key()).await.unwrap().unwrap();
            assert!(session.stack.is_empty());
        }

        #[tokio::test]
        async fn booking_intent_begins_booking_with_entities() {
            let f = fixture(MockIntentClassifier::new().with_result(
                IntentResult::new(Intent::BookFacilities).with_entity(SlotField::FacilityType, "cubicle"),
            ));

            let replies = f.handler.handle(message("book a cubicle")).await;

            assert_eq!(texts(&replies), vec![prompts::ASK_EMPLOYEE_ID]);
            let session = f.store.load(&key()).await.unwrap().unwrap();
            assert_eq!(session.slots.get(SlotField::FacilityType), Some("cubicle"));
            assert_eq!(session.stack.active_flow(), Some(&FlowName::BOOKING));
            assert_eq!(session.turn_count, 1);
        }

        #[tokio::test]
        async fn active_dialog_is_resumed_without_classifying() {
            let f = fixture(MockIntentClassifier::new().with_result(IntentResult::new(Intent::BookFacilities)));
            f.handler.handle(message("book")).await;

            let replies = f.handler.handle(message("cubicle")).await;

            assert_eq!(texts(&replies), vec![prompts::ASK_EMPLOYEE_ID]);
            assert_eq!(f.classifier.calls(), vec!["book"]);
        }

        #[tokio::test]
        async fn structured_value_text_is_preferred() {
            let f = fixture(MockIntentClassifier::new());
            let activity = Activity::message_value(serde_json::json!({ "x": "book a cubicle" })).with_text("ignored");

            f.handler.handle(HandleTurnCommand::new(key(), activity)).await;

            assert_eq!(f.classifier.calls(), vec!["book a cubicle"]);
        }
    }

    mod failures {
        use super::*;

        #[tokio::test]
        async fn store_failure_is_silent() {
            let renderer = Arc::new(AdaptiveCardRenderer::embedded().unwrap());
            let handler = TurnHandler::new(
                Arc::new(facility_engine(Arc::new(StaticDirectory::new()), renderer.clone())),
                Arc::new(MockIntentClassifier::new()),
                Arc::new(BrokenStore),
                renderer,
            );

            assert!(handler.handle(message("hello")).await.is_empty());
            let err = handler.try_handle(message("hello")).await.unwrap_err();
            assert!(matches!(err, TurnError::Storage(_)));
        }

        #[tokio::test]
        async fn timed_out_turn_leaves_stored_session_untouched() {
            let classifier = MockIntentClassifier::new()
                .with_result(IntentResult::new(Intent::BookFacilities))
                .with_delay(Duration::from_millis(200));
            let f = fixture(classifier);
            let handler = f.handler.with_turn_timeout(Duration::from_millis(20));

            let err = handler.try_handle(message("book")).await.unwrap_err();

            assert!(matches!(err, TurnError::Timeout { .. }));
            assert_eq!(f.store.session_count().await, 0);
        }
    }
}
