//! Identity provider seam and its REST implementation.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::AuthError;
use crate::config::AuthConfig;

/// Credentials returned by a successful sign-in or sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Bearer token identifying the user.
    pub id_token: String,
    /// Email the account is registered under.
    pub email: String,
}

/// The capabilities the app needs from an identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Sign in with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Create an account with email and password.
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Send a password-reset email.
    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError>;
}

/// Identity toolkit REST client (`accounts:*` endpoints).
#[derive(Debug, Clone)]
pub struct RestIdentityProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    id_token: String,
    #[serde(default)]
    email: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl RestIdentityProvider {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Build from config; `None` when no API key is configured.
    pub fn from_config(config: &AuthConfig) -> Option<Self> {
        config
            .api_key
            .as_deref()
            .map(|key| Self::new(&config.base_url, key))
    }

    fn url(&self, method: &str) -> String {
        format!(
            "{}/accounts:{method}?key={}",
            self.base_url,
            urlencoding::encode(&self.api_key)
        )
    }

    async fn call(&self, method: &str, body: serde_json::Value) -> Result<reqwest::Response, AuthError> {
        debug!(method, "Calling identity provider");
        let resp = self.http.post(self.url(method)).json(&body).send().await?;

        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        match resp.json::<ErrorEnvelope>().await {
            Ok(envelope) => Err(AuthError::from_code(&envelope.error.message)),
            Err(_) => Err(AuthError::Unknown(format!(
                "Identity provider responded with status: {status}"
            ))),
        }
    }

    async fn token_call(&self, method: &str, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let body = json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        let token: TokenResponse = self.call(method, body).await?.json().await?;
        Ok(AuthSession {
            id_token: token.id_token,
            email: if token.email.is_empty() {
                email.to_string()
            } else {
                token.email
            },
        })
    }
}

#[async_trait]
impl IdentityProvider for RestIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        self.token_call("signInWithPassword", email, password).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        self.token_call("signUp", email, password).await
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let body = json!({
            "requestType": "PASSWORD_RESET",
            "email": email,
        });
        self.call("sendOobCode", body).await?;
        Ok(())
    }
}
