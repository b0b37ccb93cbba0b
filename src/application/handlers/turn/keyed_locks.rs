//! Per-conversation turn serialization.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::ConversationKey;

type LockMap = HashMap<ConversationKey, Arc<AsyncMutex<()>>>;

/// One async lock per conversation key. Entries are dropped once no turn
/// holds or waits on them.
#[derive(Debug, Default, Clone)]
pub struct KeyedLocks {
    locks: Arc<Mutex<LockMap>>,
}

/// Held for the duration of one turn.
#[derive(Debug)]
pub struct TurnPermit {
    guard: Option<OwnedMutexGuard<()>>,
    key: ConversationKey,
    locks: Arc<Mutex<LockMap>>,
}

fn lock_map(locks: &Mutex<LockMap>) -> MutexGuard<'_, LockMap> {
    locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other turn for `key` is running.
    pub async fn acquire(&self, key: &ConversationKey) -> TurnPermit {
        let lock = lock_map(&self.locks)
            .entry(key.clone())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone();
        let guard = lock.lock_owned().await;
        TurnPermit {
            guard: Some(guard),
            key: key.clone(),
            locks: Arc::clone(&self.locks),
        }
    }

    /// Number of keys with a running or waiting turn.
    pub fn active_keys(&self) -> usize {
        lock_map(&self.locks).len()
    }
}

impl Drop for TurnPermit {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = lock_map(&self.locks);
        if let Some(lock) = locks.get(&self.key) {
            // Only the map still references it
            if Arc::strong_count(lock) == 1 {
                locks.remove(&self.key);
            }
        }
    }
}
