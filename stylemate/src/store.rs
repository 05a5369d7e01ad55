//! In-memory chat session store.
//!
//! Sessions are kept newest-first. Exactly one session is current at any
//! time and the collection is never left empty.

use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::{Message, Session, DEFAULT_TITLE, WELCOME_TITLE};

/// Ordered collection of chat sessions plus the current-session pointer.
#[derive(Debug)]
pub struct ChatSessionStore {
    sessions: Vec<Session>,
    current_id: String,
}

impl Default for ChatSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSessionStore {
    /// Create a store holding a single welcome session.
    pub fn new() -> Self {
        let welcome = Session::new(WELCOME_TITLE);
        Self {
            current_id: welcome.id.clone(),
            sessions: vec![welcome],
        }
    }

    /// Create a fresh seeded session, prepend it and make it current.
    pub fn create_session(&mut self) -> &Session {
        let session = Session::new(DEFAULT_TITLE);
        info!(session_id = %session.id, "Created chat session");
        self.current_id = session.id.clone();
        self.sessions.insert(0, session);
        &self.sessions[0]
    }

    /// Make another session current.
    ///
    /// Unknown ids are rejected and the pointer stays where it was.
    pub fn switch_to(&mut self, session_id: &str) -> Result<(), StoreError> {
        if self.get(session_id).is_none() {
            return Err(StoreError::SessionNotFound(session_id.to_string()));
        }
        debug!(session_id, "Switched chat session");
        self.current_id = session_id.to_string();
        Ok(())
    }

    /// Remove a session. Unknown ids are ignored.
    ///
    /// If the current session is removed, the first remaining one becomes
    /// current; if nothing remains, a new seeded session is created.
    pub fn delete_session(&mut self, session_id: &str) {
        let before = self.len();
        self.sessions.retain(|s| s.id != session_id);
        if self.len() == before {
            return;
        }
        info!(session_id, "Deleted chat session");

        if self.is_empty() {
            self.create_session();
        } else if self.current_id == session_id {
            self.current_id = self.sessions[0].id.clone();
        }
    }

    /// Append a message to a session, updating its title on the first user turn.
    pub fn append_message(&mut self, session_id: &str, message: Message) -> Result<(), StoreError> {
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| StoreError::SessionNotFound(session_id.to_string()))?;
        debug!(session_id, role = %message.role, "Appending message");
        session.push(message);
        Ok(())
    }

    /// Look up a session by id.
    pub fn get(&self, session_id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    /// The current session.
    pub fn current(&self) -> Option<&Session> {
        self.get(&self.current_id)
    }

    /// Id of the current session.
    pub fn current_id(&self) -> &str {
        &self.current_id
    }

    /// All sessions, newest first.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
