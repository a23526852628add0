/*!
 * In-memory registry of session contexts.
 *
 * Contexts are keyed by a random session id and live only as long as the
 * process. The lock is held just long enough to read or write a context,
 * never across a network call.
 */

use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use uuid::Uuid;

use super::models::SessionContext;

/// Session manager holding one context per session id
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: Mutex<HashMap<Uuid, SessionContext>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new empty session
    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.lock().insert(id, SessionContext::new());
        debug!("Created session {}", &id.to_string()[..8]);
        id
    }

    pub fn exists(&self, id: &Uuid) -> bool {
        self.sessions.lock().contains_key(id)
    }

    /// Copy of a session's context
    pub fn snapshot(&self, id: &Uuid) -> Option<SessionContext> {
        self.sessions.lock().get(id).cloned()
    }

    /// Run `f` against a session's context under the lock
    pub fn with_session<R>(&self, id: &Uuid, f: impl FnOnce(&mut SessionContext) -> R) -> Option<R> {
        self.sessions.lock().get_mut(id).map(f)
    }

    /// Replace a session's context, if the session still exists
    pub fn store(&self, id: &Uuid, context: SessionContext) -> bool {
        match self.sessions.lock().get_mut(id) {
            Some(slot) => {
                *slot = context;
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, id: &Uuid) -> Option<SessionContext> {
        self.sessions.lock().remove(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
