//! Identity provider failures and the notices shown for them.

use thiserror::Error;

/// A failure reported by the identity provider.
///
/// Provider error codes are an open set; anything not listed here ends up in
/// [`AuthError::Unknown`] with the provider's raw message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredential,

    #[error("No account found for this email")]
    UserNotFound,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("This account has been disabled")]
    UserDisabled,

    #[error("Too many attempts, try again later")]
    TooManyRequests,

    #[error("Network request failed")]
    NetworkError,

    #[error("Email/password sign-in is not enabled")]
    OperationNotAllowed,

    #[error("Email already in use")]
    EmailAlreadyInUse,

    #[error("Password is too weak")]
    WeakPassword,

    /// Unmapped provider code; carries the provider's message.
    #[error("{0}")]
    Unknown(String),
}

impl AuthError {
    /// Map a provider error code to a variant.
    ///
    /// Accepts the REST codes (`EMAIL_EXISTS`, `WEAK_PASSWORD : ...`) as well
    /// as the SDK style (`auth/email-already-in-use`).
    pub fn from_code(code: &str) -> Self {
        let key = code.split(':').next().unwrap_or(code).trim();
        match key {
            "INVALID_LOGIN_CREDENTIALS" | "INVALID_PASSWORD" | "auth/invalid-credential"
            | "auth/wrong-password" => Self::InvalidCredential,
            "EMAIL_NOT_FOUND" | "auth/user-not-found" => Self::UserNotFound,
            "INVALID_EMAIL" | "MISSING_EMAIL" | "auth/invalid-email" => Self::InvalidEmail,
            "USER_DISABLED" | "auth/user-disabled" => Self::UserDisabled,
            "TOO_MANY_ATTEMPTS_TRY_LATER" | "auth/too-many-requests" => Self::TooManyRequests,
            "auth/network-request-failed" => Self::NetworkError,
            "OPERATION_NOT_ALLOWED" | "PASSWORD_LOGIN_DISABLED" | "auth/operation-not-allowed" => {
                Self::OperationNotAllowed
            }
            "EMAIL_EXISTS" | "auth/email-already-in-use" => Self::EmailAlreadyInUse,
            "WEAK_PASSWORD" | "auth/weak-password" => Self::WeakPassword,
            _ => Self::Unknown(code.to_string()),
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(_: reqwest::Error) -> Self {
        Self::NetworkError
    }
}

/// The flow an error happened in; each words its notices differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFlow {
    Login,
    Signup,
    PasswordReset,
}

/// A title/message pair for a user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthNotice {
    pub title: String,
    pub message: String,
}

impl AuthNotice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for AuthNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

impl AuthError {
    /// The notice to show for this error in `flow`.
    pub fn notice(&self, flow: AuthFlow) -> AuthNotice {
        match flow {
            AuthFlow::Login => self.login_notice(),
            AuthFlow::Signup => self.signup_notice(),
            AuthFlow::PasswordReset => self.reset_notice(),
        }
    }

    fn login_notice(&self) -> AuthNotice {
        match self {
            Self::InvalidCredential | Self::UserNotFound => AuthNotice::new(
                "❌ Invalid Credentials",
                "The email or password you entered is incorrect. Please try again or click \"Forgot Password\" to reset it.",
            ),
            Self::InvalidEmail => {
                AuthNotice::new("❌ Invalid Email", "Please enter a valid email address.")
            }
            Self::UserDisabled => AuthNotice::new(
                "❌ Account Disabled",
                "This account has been disabled. Please contact support for assistance.",
            ),
            Self::TooManyRequests => AuthNotice::new(
                "⚠️ Too Many Login Attempts",
                "Access temporarily blocked due to too many failed attempts. Please try again in a few minutes or reset your password.",
            ),
            Self::NetworkError => AuthNotice::new(
                "🌐 Network Error",
                "Unable to connect to the server. Please check your internet connection and try again.",
            ),
            Self::OperationNotAllowed => AuthNotice::new(
                "⚠️ Service Unavailable",
                "Email/password sign-in is currently disabled. Please contact support.",
            ),
            other => AuthNotice::new("❌ Login Error", other.raw_message()),
        }
    }

    fn signup_notice(&self) -> AuthNotice {
        match self {
            Self::EmailAlreadyInUse => AuthNotice::new(
                "❌ Email Already Registered",
                "This email is already in use. Please login or use a different email.",
            ),
            Self::WeakPassword => AuthNotice::new(
                "❌ Weak Password",
                "Password should be at least 6 characters long.",
            ),
            Self::InvalidEmail => {
                AuthNotice::new("❌ Invalid Email", "Please enter a valid email address.")
            }
            Self::OperationNotAllowed => AuthNotice::new(
                "⚠️ Service Unavailable",
                "Email/password accounts are not enabled. Please contact support.",
            ),
            Self::NetworkError => AuthNotice::new(
                "🌐 Network Error",
                "Unable to connect. Please check your internet connection.",
            ),
            other => AuthNotice::new("Signup Failed", other.raw_message()),
        }
    }

    fn reset_notice(&self) -> AuthNotice {
        match self {
            Self::UserNotFound => AuthNotice::new(
                "❌ Account Not Found",
                "No account found with this email address.",
            ),
            Self::InvalidEmail => {
                AuthNotice::new("❌ Invalid Email", "Please enter a valid email address.")
            }
            Self::TooManyRequests => AuthNotice::new(
                "⚠️ Too Many Attempts",
                "Too many reset attempts. Please try again later.",
            ),
            other => AuthNotice::new("Reset Failed", other.raw_message()),
        }
    }

    fn raw_message(&self) -> String {
        match self {
            Self::Unknown(raw) if raw.is_empty() => {
                "An unexpected error occurred. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}
