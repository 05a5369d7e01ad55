//! Client-side checks run before the identity provider is contacted.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::AuthNotice;

/// Shortest password the signup form accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// A form field failed validation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid email address (e.g., user@example.com)")]
    InvalidEmailFormat,

    #[error("Please enter your password")]
    PasswordRequired,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters long.")]
    WeakPassword,

    #[error("Please enter your email address")]
    EmailRequired,
}

impl ValidationError {
    /// Title and message to show the user.
    pub fn notice(self) -> AuthNotice {
        let title = match self {
            Self::InvalidEmailFormat => "❌ Invalid Email Format",
            Self::PasswordRequired => "❌ Password Required",
            Self::PasswordMismatch => "Password mismatch",
            Self::WeakPassword => "❌ Weak Password",
            Self::EmailRequired => "Email required",
        };
        AuthNotice::new(title, self.to_string())
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Check the login form.
pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmailFormat);
    }
    if password.trim().is_empty() {
        return Err(ValidationError::PasswordRequired);
    }
    Ok(())
}

/// Check the signup form. Email format is left to the provider.
pub fn validate_signup(password: &str, confirm_password: &str) -> Result<(), ValidationError> {
    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::WeakPassword);
    }
    Ok(())
}

/// Check the password-reset form.
pub fn validate_reset(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    Ok(())
}
