//! Session model representing one chat conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Message;

/// Title given to sessions created with the "new chat" action.
pub const DEFAULT_TITLE: &str = "New Chat";

/// Title of the session a fresh store starts with.
pub const WELCOME_TITLE: &str = "Welcome Chat";

/// Greeting every session is seeded with.
pub const GREETING: &str = "Hello! I'm your personal style assistant. I can help you find the perfect outfit for any occasion. What are you looking to style today?";

/// Number of characters of the first user message used for the title.
const TITLE_CHARS: usize = 30;

/// A chat session: an ordered, append-only list of messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier.
    pub id: String,
    /// Human-readable label shown in the session list.
    pub title: String,
    /// Messages in chronological (insertion) order.
    messages: Vec<Message>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session seeded with the assistant greeting.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            title: title.into(),
            messages: vec![Message::assistant(GREETING)],
            created_at: Utc::now(),
        }
    }

    /// Messages in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether a user has spoken in this session yet.
    pub fn has_user_message(&self) -> bool {
        self.messages.iter().any(Message::is_user)
    }

    /// Append a message, deriving the title from the first user turn.
    ///
    /// The title is always the first 30 characters followed by `...`, even
    /// when the content is shorter than that.
    pub(crate) fn push(&mut self, message: Message) {
        if message.is_user() && !self.has_user_message() {
            self.title = derive_title(&message.content);
        }
        self.messages.push(message);
    }
}

fn derive_title(content: &str) -> String {
    let head: String = content.chars().take(TITLE_CHARS).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_seeded_with_greeting() {
        let session = Session::new(DEFAULT_TITLE);
        assert_eq!(session.title, "New Chat");
        assert_eq!(session.messages().len(), 1);
        assert!(!session.messages()[0].is_user());
        assert_eq!(session.messages()[0].content, GREETING);
    }

    #[test]
    fn long_first_message_is_truncated() {
        let mut session = Session::new(DEFAULT_TITLE);
        session.push(Message::user(
            "Find me a casual weekend look for brunch with friends downtown",
        ));
        assert_eq!(session.title, "Find me a casual weekend look ...");
    }

    #[test]
    fn short_first_message_still_gets_ellipsis() {
        let mut session = Session::new(DEFAULT_TITLE);
        session.push(Message::user("Date night"));
        assert_eq!(session.title, "Date night...");
    }

    #[test]
    fn only_first_user_message_sets_title() {
        let mut session = Session::new(DEFAULT_TITLE);
        session.push(Message::user("first"));
        session.push(Message::assistant("reply"));
        session.push(Message::user("second"));
        assert_eq!(session.title, "first...");
        assert_eq!(session.messages().len(), 4);
    }

    #[test]
    fn truncation_counts_characters() {
        let mut session = Session::new(DEFAULT_TITLE);
        session.push(Message::user("é".repeat(40)));
        assert_eq!(session.title, format!("{}...", "é".repeat(30)));
    }
}
