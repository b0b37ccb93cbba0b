//! Mock Intent Classifier for testing.
//!
//! Returns pre-configured results in order and records every utterance it
//! was asked to classify. Once the script runs out it answers `none`.
//!
//! # Example
//!
//! ```ignore
//! let classifier = MockIntentClassifier::new()
//!     .with_result(IntentResult::new(Intent::BookFacilities))
//!     .with_error(ClassifierError::Timeout);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::conversation::IntentResult;
use crate::ports::{ClassifierError, IntentClassifier};

/// Scripted classifier for tests.
#[derive(Debug, Clone, Default)]
pub struct MockIntentClassifier {
    /// Pre-configured outcomes (consumed in order).
    script: Arc<Mutex<VecDeque<Result<IntentResult, ClassifierError>>>>,
    /// Simulated latency per call.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockIntentClassifier {
    /// Creates a classifier with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful classification.
    pub fn with_result(self, result: IntentResult) -> Self {
        lock(&self.script).push_back(Ok(result));
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: ClassifierError) -> Self {
        lock(&self.script).push_back(Err(error));
        self
    }

    /// Sets simulated latency.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Utterances classified so far.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

#[async_trait]
impl IntentClassifier for MockIntentClassifier {
    async fn classify(&self, text: &str) -> Result<IntentResult, ClassifierError> {
        lock(&self.calls).push(text.to_string());
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        let next = lock(&self.script).pop_front();
        next.unwrap_or_else(|| Ok(IntentResult::none()))
    }
}
