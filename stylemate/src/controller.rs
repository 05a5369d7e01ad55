//! Chat turn orchestration.
//!
//! A turn goes: guards, append user message, wait on the recommender, append
//! the reply (or a scripted apology), stop waiting. Failures never escape a
//! turn; they become conversation content.

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::client::Recommender;
use crate::error::SubmitError;
use crate::models::{Message, StylePreference};
use crate::store::ChatSessionStore;

/// Reply appended when the recommendation service cannot be reached.
pub const FALLBACK_REPLY: &str =
    "I'm having trouble connecting to my knowledge base right now. Please try again in a moment!";

/// Per-screen state the controller needs besides the sessions.
#[derive(Debug, Clone, Default)]
pub struct ChatContext {
    /// Chosen style preference. Must be set before a turn is sent.
    pub preference: Option<StylePreference>,
}

impl ChatContext {
    pub const fn with_preference(preference: StylePreference) -> Self {
        Self {
            preference: Some(preference),
        }
    }

    /// Forget the preference, as on logout.
    pub fn reset(&mut self) {
        self.preference = None;
    }
}

/// What happened to a submitted turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was sent (blank input or no current session).
    Ignored,
    /// The service replied and the reply was appended.
    Answered,
    /// The service failed; the fallback reply was appended.
    Fallback {
        /// Why the request failed, for a notification.
        error: String,
    },
}

/// Drives chat turns against a session store and a recommender.
pub struct ChatController<R> {
    store: ChatSessionStore,
    context: ChatContext,
    recommender: R,
    pending_input: String,
    waiting: watch::Sender<bool>,
}

impl<R: Recommender> ChatController<R> {
    pub fn new(store: ChatSessionStore, context: ChatContext, recommender: R) -> Self {
        let (waiting, _) = watch::channel(false);
        Self {
            store,
            context,
            recommender,
            pending_input: String::new(),
            waiting,
        }
    }

    pub const fn store(&self) -> &ChatSessionStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ChatSessionStore {
        &mut self.store
    }

    pub const fn context(&self) -> &ChatContext {
        &self.context
    }

    pub const fn recommender(&self) -> &R {
        &self.recommender
    }

    pub fn context_mut(&mut self) -> &mut ChatContext {
        &mut self.context
    }

    /// Text typed but not yet sent.
    #[cfg(test)]
    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.pending_input = input.into();
    }

    /// Whether a turn is waiting on the recommender.
    #[cfg(test)]
    pub fn is_waiting(&self) -> bool {
        *self.waiting.borrow()
    }

    /// Watch the waiting flag, e.g. to show a typing indicator.
    pub fn subscribe_waiting(&self) -> watch::Receiver<bool> {
        self.waiting.subscribe()
    }

    /// Set `input` as pending and send it.
    pub async fn submit(&mut self, input: &str) -> Result<SubmitOutcome, SubmitError> {
        self.set_input(input);
        self.send().await
    }

    /// Send the pending input as one turn.
    ///
    /// Returns `Err(SubmitError::PreferenceRequired)` without touching any
    /// session when no style preference is set.
    pub async fn send(&mut self) -> Result<SubmitOutcome, SubmitError> {
        if self.pending_input.trim().is_empty() {
            return Ok(SubmitOutcome::Ignored);
        }
        let Some(preference) = self.context.preference else {
            return Err(SubmitError::PreferenceRequired);
        };
        let Some(session_id) = self.store.current().map(|s| s.id.clone()) else {
            return Ok(SubmitOutcome::Ignored);
        };

        let text = std::mem::take(&mut self.pending_input);
        if self
            .store
            .append_message(&session_id, Message::user(text.clone()))
            .is_err()
        {
            return Ok(SubmitOutcome::Ignored);
        }

        self.waiting.send_replace(true);
        let result = self.recommender.request(&text, Some(preference)).await;

        let (reply, outcome) = match result {
            Ok(reply) => {
                info!(session_id = %session_id, "Received recommendation");
                (reply, SubmitOutcome::Answered)
            }
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Recommendation request failed");
                (
                    FALLBACK_REPLY.to_string(),
                    SubmitOutcome::Fallback {
                        error: e.to_string(),
                    },
                )
            }
        };

        if let Err(e) = self
            .store
            .append_message(&session_id, Message::assistant(reply))
        {
            debug!(error = %e, "Dropping reply for deleted session");
        }
        self.waiting.send_replace(false);
        Ok(outcome)
    }
}
