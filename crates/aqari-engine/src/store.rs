//! In-memory conversation store.
//!
//! Encapsulates what the deployed script kept as loose module-level
//! maps: open sessions and the completed-sender set. All mutation goes
//! through these accessors; `reset_all` takes the same lock as every
//! other operation, so a template reload can never race a live
//! transition.

use crate::session::Session;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct StoreInner {
    sessions: HashMap<String, Session>,
    completed: HashSet<String>,
}

/// Process-wide session + completed-set store.
#[derive(Default)]
pub struct ConversationStore {
    inner: Mutex<StoreInner>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the sender's session, if one is open.
    pub fn get(&self, sender_id: &str) -> Option<Session> {
        self.inner
            .lock()
            .expect("store lock poisoned")
            .sessions
            .get(sender_id)
            .cloned()
    }

    /// Insert or replace the sender's session.
    pub fn put(&self, session: Session) {
        self.inner
            .lock()
            .expect("store lock poisoned")
            .sessions
            .insert(session.sender_id.clone(), session);
    }

    /// Delete the sender's session, if any.
    pub fn remove(&self, sender_id: &str) {
        self.inner
            .lock()
            .expect("store lock poisoned")
            .sessions
            .remove(sender_id);
    }

    /// Whether the sender already completed a conversation this
    /// generation.
    pub fn is_completed(&self, sender_id: &str) -> bool {
        self.inner
            .lock()
            .expect("store lock poisoned")
            .completed
            .contains(sender_id)
    }

    /// Add the sender to the completed set. Subsequent messages from
    /// them are dropped until `reset_all`.
    pub fn mark_completed(&self, sender_id: &str) {
        self.inner
            .lock()
            .expect("store lock poisoned")
            .completed
            .insert(sender_id.to_string());
    }

    pub fn open_count(&self) -> usize {
        self.inner.lock().expect("store lock poisoned").sessions.len()
    }

    pub fn completed_count(&self) -> usize {
        self.inner.lock().expect("store lock poisoned").completed.len()
    }

    /// Administrative reset: drop every open session and forget every
    /// completed sender. Everyone starts fresh afterwards.
    pub fn reset_all(&self) {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.sessions.clear();
        inner.completed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Step;

    #[test]
    fn test_put_get_remove() {
        let store = ConversationStore::new();
        assert!(store.get("a").is_none());

        store.put(Session::new("a"));
        let s = store.get("a").unwrap();
        assert_eq!(s.step, Step::ChooseLang);
        assert_eq!(store.open_count(), 1);

        store.remove("a");
        assert!(store.get("a").is_none());
        assert_eq!(store.open_count(), 0);
    }

    #[test]
    fn test_get_returns_a_copy() {
        let store = ConversationStore::new();
        store.put(Session::new("a"));

        let mut copy = store.get("a").unwrap();
        copy.advance(Step::Welcome);
        // Mutating the copy does not touch stored state.
        assert_eq!(store.get("a").unwrap().step, Step::ChooseLang);
    }

    #[test]
    fn test_completed_set() {
        let store = ConversationStore::new();
        assert!(!store.is_completed("a"));
        store.mark_completed("a");
        assert!(store.is_completed("a"));
        assert_eq!(store.completed_count(), 1);
    }

    #[test]
    fn test_reset_all_clears_everything() {
        let store = ConversationStore::new();
        store.put(Session::new("a"));
        store.put(Session::new("b"));
        store.mark_completed("c");

        store.reset_all();
        assert_eq!(store.open_count(), 0);
        assert_eq!(store.completed_count(), 0);
        assert!(!store.is_completed("c"));
    }
}
