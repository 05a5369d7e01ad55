//! Recommendation service client.
//!
//! One `POST /api/chat` per user turn. The call is bounded by a timer that
//! cancels a [`CancellationToken`]; there are no retries.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::{ChatRequest, ChatResponse};
use crate::config::ApiConfig;
use crate::error::RecommendError;
use crate::models::StylePreference;

/// Generic failure text for error-flagged responses without a message.
const UNKNOWN_ERROR: &str = "Unknown error";

/// Something that turns a user message into an assistant reply.
#[async_trait]
pub trait Recommender: Send + Sync {
    /// Ask for a recommendation. At most one attempt is made.
    async fn request(
        &self,
        message: &str,
        preference: Option<StylePreference>,
    ) -> Result<String, RecommendError>;
}

/// HTTP client for the remote recommendation service.
#[derive(Debug, Clone)]
pub struct RecommendationClient {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl RecommendationClient {
    /// Create a client for `<base_url>/api/chat`.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
            timeout,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(&config.base_url, config.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run the request until it resolves or `cancel` fires.
    async fn request_until_cancelled(
        &self,
        message: &str,
        preference: Option<StylePreference>,
        cancel: &CancellationToken,
    ) -> Result<String, RecommendError> {
        tokio::select! {
            () = cancel.cancelled() => Err(RecommendError::Timeout(self.timeout)),
            result = self.send(message, preference) => result,
        }
    }

    async fn send(
        &self,
        message: &str,
        preference: Option<StylePreference>,
    ) -> Result<String, RecommendError> {
        let body = ChatRequest {
            message: message.to_string(),
            gender: Some(StylePreference::wire_value(preference).to_string()),
        };
        debug!(endpoint = %self.endpoint, gender = ?body.gender, "Sending recommendation request");

        let resp = self.http.post(&self.endpoint).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(%status, body = %text, "Recommendation service returned an error status");
            return Err(RecommendError::Status(status.as_u16()));
        }

        let payload: ChatResponse = resp.json().await?;
        match payload.text() {
            Some(text) => Ok(text.to_string()),
            None => Err(RecommendError::Service(
                payload
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            )),
        }
    }
}

#[async_trait]
impl Recommender for RecommendationClient {
    async fn request(
        &self,
        message: &str,
        preference: Option<StylePreference>,
    ) -> Result<String, RecommendError> {
        let cancel = CancellationToken::new();
        let timer = {
            let cancel = cancel.clone();
            let timeout = self.timeout;
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                cancel.cancel();
            })
        };

        let result = self.request_until_cancelled(message, preference, &cancel).await;
        timer.abort();
        result
    }
}
