//! Single-flight guard for order completion.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Payment intents currently being completed in this process.
#[derive(Clone, Default)]
pub struct InFlightCheckouts {
    inner: Arc<Mutex<HashSet<String>>>,
}

impl InFlightCheckouts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `intent_id`. Returns `None` if another request holds it.
    ///
    /// The claim is released when the guard is dropped.
    #[must_use]
    pub fn try_acquire(&self, intent_id: &str) -> Option<InFlightGuard> {
        let mut set = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if !set.insert(intent_id.to_owned()) {
            return None;
        }
        Some(InFlightGuard {
            owner: Arc::clone(&self.inner),
            intent_id: intent_id.to_owned(),
        })
    }

    /// Whether `intent_id` is currently claimed.
    #[must_use]
    pub fn contains(&self, intent_id: &str) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(intent_id)
    }
}

/// Releases its intent id on drop.
pub struct InFlightGuard {
    owner: Arc<Mutex<HashSet<String>>>,
    intent_id: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.owner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.intent_id);
    }
}
