//! Error types for the chat core.

use std::time::Duration;

use thiserror::Error;

/// Errors from the session store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No session with this id exists.
    #[error("Session not found: {0}")]
    SessionNotFound(String),
}

/// Failure of a recommendation request.
///
/// Callers only ever show the message; the variants exist for logging.
#[derive(Debug, Error)]
pub enum RecommendError {
    /// No response arrived within the time bound.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection refused, DNS failure, body read error and the like.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("Server responded with status: {0}")]
    Status(u16),

    /// The server answered but flagged the request as failed.
    #[error("{0}")]
    Service(String),
}

/// Reasons a submitted turn is rejected before anything happens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// A style preference must be chosen before asking for outfits.
    #[error("Please select a style preference (Men/Women/Unisex) before sending your message.")]
    PreferenceRequired,
}
