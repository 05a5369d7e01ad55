//! Login, signup, password reset and logout.
//!
//! Each flow validates the form locally, delegates to an
//! [`IdentityProvider`], persists credentials through a [`TokenStore`], and
//! ends in an [`AuthNotice`] for the user: `Ok` on success, `Err` on failure.

mod error;
mod provider;
mod token;
mod validate;

use tracing::{info, warn};

pub use error::{AuthError, AuthFlow, AuthNotice};
pub use provider::{IdentityProvider, RestIdentityProvider};
pub use token::TokenStore;
pub use validate::{validate_login, validate_reset, validate_signup, ValidationError};

use crate::controller::ChatContext;

/// Result of an auth flow: a notice either way.
pub type FlowResult = Result<AuthNotice, AuthNotice>;

fn storage_failure(e: &anyhow::Error) -> AuthNotice {
    warn!(error = %e, "Failed to persist credentials");
    AuthNotice::new("Storage Error", format!("Could not save your session: {e:#}"))
}

/// Sign in and store the returned token.
pub async fn login(
    provider: &dyn IdentityProvider,
    tokens: &TokenStore,
    email: &str,
    password: &str,
) -> FlowResult {
    validate_login(email, password).map_err(ValidationError::notice)?;

    let session = provider.sign_in(email, password).await.map_err(|e| {
        warn!(error = %e, "Login failed");
        e.notice(AuthFlow::Login)
    })?;
    tokens
        .set_auth_token(&session.id_token)
        .map_err(|e| storage_failure(&e))?;

    info!(email = %session.email, "Logged in");
    Ok(AuthNotice::new(
        "✨ Welcome back!",
        "Let's find your perfect style today.",
    ))
}

/// Create an account and store the token and display name.
pub async fn signup(
    provider: &dyn IdentityProvider,
    tokens: &TokenStore,
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> FlowResult {
    validate_signup(password, confirm_password).map_err(ValidationError::notice)?;

    let session = provider.sign_up(email, password).await.map_err(|e| {
        warn!(error = %e, "Signup failed");
        e.notice(AuthFlow::Signup)
    })?;
    tokens
        .set_auth_token(&session.id_token)
        .and_then(|()| tokens.set_user_name(name))
        .map_err(|e| storage_failure(&e))?;

    info!(email = %session.email, "Account created");
    Ok(AuthNotice::new(
        "🎉 Account created!",
        "Your style journey begins now.",
    ))
}

/// Ask the provider to email a password-reset link.
pub async fn reset_password(provider: &dyn IdentityProvider, email: &str) -> FlowResult {
    validate_reset(email).map_err(ValidationError::notice)?;

    provider.send_password_reset(email).await.map_err(|e| {
        warn!(error = %e, "Password reset failed");
        e.notice(AuthFlow::PasswordReset)
    })?;

    Ok(AuthNotice::new(
        "✉️ Email sent!",
        "Check your inbox for password reset instructions.",
    ))
}

/// Drop stored credentials and the chat preference.
pub fn logout(tokens: &TokenStore, context: &mut ChatContext) -> FlowResult {
    tokens.clear().map_err(|e| {
        warn!(error = %e, "Logout failed");
        AuthNotice::new("Logout failed", "Please try again")
    })?;
    context.reset();
    info!("Logged out");
    Ok(AuthNotice::new(
        "Logged out successfully",
        "See you again soon!",
    ))
}

#[cfg(test)]
mod tests {
    use super::provider::AuthSession;
    use super::*;
    use crate::models::StylePreference;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Provider that accepts one password and counts calls.
    #[derive(Default)]
    struct FakeProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IdentityProvider for FakeProvider {
        async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if password == "secret1" {
                Ok(AuthSession {
                    id_token: "tok".to_string(),
                    email: email.to_string(),
                })
            } else {
                Err(AuthError::InvalidCredential)
            }
        }

        async fn sign_up(&self, email: &str, _password: &str) -> Result<AuthSession, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if email == "taken@example.com" {
                return Err(AuthError::EmailAlreadyInUse);
            }
            Ok(AuthSession {
                id_token: "new-tok".to_string(),
                email: email.to_string(),
            })
        }

        async fn send_password_reset(&self, _email: &str) -> Result<(), AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AuthError::TooManyRequests)
        }
    }

    fn tokens(dir: &TempDir) -> TokenStore {
        TokenStore::at(dir.path().join("auth.json"))
    }

    #[tokio::test]
    async fn login_stores_token() {
        let dir = TempDir::new().unwrap();
        let store = tokens(&dir);
        let notice = login(&FakeProvider::default(), &store, "user@example.com", "secret1")
            .await
            .unwrap();
        assert_eq!(notice.title, "✨ Welcome back!");
        assert_eq!(store.auth_token().unwrap().as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn invalid_email_never_reaches_provider() {
        let dir = TempDir::new().unwrap();
        let provider = FakeProvider::default();
        let notice = login(&provider, &tokens(&dir), "not-an-email", "secret1")
            .await
            .unwrap_err();
        assert_eq!(notice.title, "❌ Invalid Email Format");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn wrong_password_maps_to_notice() {
        let dir = TempDir::new().unwrap();
        let store = tokens(&dir);
        let notice = login(&FakeProvider::default(), &store, "user@example.com", "nope")
            .await
            .unwrap_err();
        assert_eq!(notice.title, "❌ Invalid Credentials");
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn signup_stores_token_and_name() {
        let dir = TempDir::new().unwrap();
        let store = tokens(&dir);
        signup(
            &FakeProvider::default(),
            &store,
            "Ada",
            "ada@example.com",
            "secret1",
            "secret1",
        )
        .await
        .unwrap();
        assert_eq!(store.auth_token().unwrap().as_deref(), Some("new-tok"));
        assert_eq!(store.user_name().unwrap().as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn signup_rejects_mismatch_locally() {
        let dir = TempDir::new().unwrap();
        let provider = FakeProvider::default();
        let notice = signup(&provider, &tokens(&dir), "Ada", "ada@example.com", "secret1", "secret2")
            .await
            .unwrap_err();
        assert_eq!(notice.title, "Password mismatch");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn signup_existing_email() {
        let dir = TempDir::new().unwrap();
        let notice = signup(
            &FakeProvider::default(),
            &tokens(&dir),
            "Ada",
            "taken@example.com",
            "secret1",
            "secret1",
        )
        .await
        .unwrap_err();
        assert_eq!(notice.title, "❌ Email Already Registered");
    }

    #[tokio::test]
    async fn reset_maps_throttling() {
        let notice = reset_password(&FakeProvider::default(), "user@example.com")
            .await
            .unwrap_err();
        assert_eq!(notice.title, "⚠️ Too Many Attempts");

        let notice = reset_password(&FakeProvider::default(), "").await.unwrap_err();
        assert_eq!(notice.title, "Email required");
    }

    #[tokio::test]
    async fn login_recovers_from_corrupt_credentials() {
        let dir = TempDir::new().unwrap();
        let store = tokens(&dir);
        std::fs::write(store.path(), "not json").unwrap();

        let notice = login(&FakeProvider::default(), &store, "user@example.com", "secret1")
            .await
            .unwrap();
        assert_eq!(notice.title, "✨ Welcome back!");
        assert_eq!(store.auth_token().unwrap().as_deref(), Some("tok"));
    }

    #[test]
    fn logout_with_corrupt_credentials_succeeds() {
        let dir = TempDir::new().unwrap();
        let store = tokens(&dir);
        std::fs::write(store.path(), "not json").unwrap();
        let mut context = ChatContext::with_preference(StylePreference::Women);

        let notice = logout(&store, &mut context).unwrap();
        assert_eq!(notice.title, "Logged out successfully");
        assert!(!store.path().exists());
        assert!(context.preference.is_none());
    }

    #[test]
    fn logout_clears_token_and_preference() {
        let dir = TempDir::new().unwrap();
        let store = tokens(&dir);
        store.set_auth_token("tok").unwrap();
        let mut context = ChatContext::with_preference(StylePreference::Men);

        let notice = logout(&store, &mut context).unwrap();
        assert_eq!(notice.title, "Logged out successfully");
        assert!(!store.is_authenticated());
        assert!(context.preference.is_none());
    }
}
