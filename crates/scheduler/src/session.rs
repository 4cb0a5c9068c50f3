use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Session-scoped string key/value store for performance samples.
///
/// Implementations are expected to survive a page-level re-initialization
/// within one operator session, nothing more. Failures to persist are not
/// surfaced; sample storage is best-effort.
pub trait SessionStore: Send + Sync {
    fn load(&self, key: &str) -> Option<String>;
    fn store(&self, key: &str, value: String);
}

/// Process-local store, used in tests and as a default when the embedding
/// application provides nothing better.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn store(&self, key: &str, value: String) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }
}
