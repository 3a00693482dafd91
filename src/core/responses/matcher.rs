//! Thread-safe access to the current rule snapshot.

use std::sync::{Arc, PoisonError, RwLock};

use super::store::{PatternStore, ResponseMatch};

/// Looks up custom command responses against a swappable [`PatternStore`].
///
/// Lookups clone the current snapshot handle and match without holding the
/// lock; [`reload`](Self::reload) replaces the snapshot wholesale.
pub struct ResponseMatcher {
    store: RwLock<Arc<PatternStore>>,
}

impl ResponseMatcher {
    pub fn new(store: PatternStore) -> Self {
        Self {
            store: RwLock::new(Arc::new(store)),
        }
    }

    /// Current snapshot. Stays valid across reloads.
    pub fn snapshot(&self) -> Arc<PatternStore> {
        Arc::clone(&self.store.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace the rule snapshot.
    pub fn reload(&self, store: PatternStore) {
        let store = Arc::new(store);
        tracing::info!(
            enabled = store.is_enabled(),
            rules = store.len(),
            "Custom command responses reloaded"
        );
        *self.store.write().unwrap_or_else(PoisonError::into_inner) = store;
    }

    pub fn is_enabled(&self) -> bool {
        self.snapshot().is_enabled()
    }

    pub fn find_match(&self, command: &str) -> Option<ResponseMatch> {
        self.snapshot().find_match(command)
    }

    /// True when any rule matches, including rules with an empty response.
    pub fn has_match(&self, command: &str) -> bool {
        self.snapshot().find_rule(command).is_some()
    }

    /// Response template for `command`, or an empty string.
    pub fn response_for(&self, command: &str) -> String {
        self.find_match(command)
            .map(|found| found.response)
            .unwrap_or_default()
    }
}

impl Default for ResponseMatcher {
    fn default() -> Self {
        Self::new(PatternStore::default())
    }
}
