//! Text generation backend used by the recommendation server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ServerConfig;

/// Why a generation attempt failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// The model is overloaded; worth retrying.
    #[error("Model overloaded: {0}")]
    Overloaded(String),

    /// Any other failure.
    #[error("{0}")]
    Failed(String),
}

impl From<reqwest::Error> for GenerateError {
    fn from(e: reqwest::Error) -> Self {
        Self::Failed(e.to_string())
    }
}

/// Produces a reply for a full prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;

    /// Model name reported by the server root.
    fn model(&self) -> &str;
}

/// `generateContent` REST client.
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiGenerator {
    pub fn new(base_url: &str, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Build from config; `None` when no API key is configured.
    pub fn from_config(config: &ServerConfig) -> Option<Self> {
        config
            .api_key
            .as_deref()
            .map(|key| Self::new(&config.generation_url, config.model.clone(), key))
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url,
            self.model,
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });
        debug!(model = %self.model, "Requesting generation");

        let resp = self.http.post(self.url()).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let detail = format!("{status}: {text}");
            if status == StatusCode::SERVICE_UNAVAILABLE || text.to_lowercase().contains("overloaded") {
                return Err(GenerateError::Overloaded(detail));
            }
            return Err(GenerateError::Failed(detail));
        }

        let parsed: GenerateResponse = resp.json().await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(GenerateError::Failed("Empty response from model".to_string()));
        }
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Stand-in used when no API key is configured; every reply explains why.
#[derive(Debug, Clone)]
pub struct MissingKeyGenerator {
    model: String,
}

impl MissingKeyGenerator {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for MissingKeyGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
        Ok("Error: GOOGLE_API_KEY not found in environment variables. Please set it before starting the server.".to_string())
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// How overload errors are retried.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
        }
    }
}

/// Generate a reply, retrying overloads with doubling delays.
///
/// Never fails: errors become apology text for the chat.
pub async fn generate_reply(generator: &dyn TextGenerator, prompt: &str, policy: RetryPolicy) -> String {
    let mut delay = policy.initial_delay;
    for attempt in 1..=policy.max_attempts {
        match generator.generate(prompt).await {
            Ok(text) => return text,
            Err(GenerateError::Overloaded(detail)) => {
                if attempt == policy.max_attempts {
                    break;
                }
                warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    %detail,
                    "Model overloaded, retrying in {delay:?}"
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            Err(GenerateError::Failed(msg)) => {
                warn!(error = %msg, "Generation failed");
                return format!("Sorry, I encountered an error: {msg}");
            }
        }
    }
    "Sorry, the AI service is currently overloaded. Please try again in a few moments.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::StatusCode as HttpStatus, response::IntoResponse, routing::post, Json, Router};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    /// Generator replaying a fixed list of results.
    struct Replay {
        results: Mutex<Vec<Result<String, GenerateError>>>,
        calls: AtomicU32,
    }

    impl Replay {
        fn new(mut results: Vec<Result<String, GenerateError>>) -> Self {
            results.reverse();
            Self {
                results: Mutex::new(results),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for Replay {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.results
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(GenerateError::Failed("exhausted".to_string())))
        }

        fn model(&self) -> &str {
            "replay"
        }
    }

    const FAST: RetryPolicy = RetryPolicy {
        max_attempts: 3,
        initial_delay: Duration::from_millis(1),
    };

    fn overloaded() -> Result<String, GenerateError> {
        Err(GenerateError::Overloaded("503".to_string()))
    }

    #[tokio::test]
    async fn overload_is_retried_until_success() {
        let generator = Replay::new(vec![overloaded(), Ok("outfits".to_string())]);
        assert_eq!(generate_reply(&generator, "p", FAST).await, "outfits");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn persistent_overload_gives_up_after_max_attempts() {
        let generator = Replay::new(vec![overloaded(), overloaded(), overloaded(), Ok("late".to_string())]);
        let reply = generate_reply(&generator, "p", FAST).await;
        assert_eq!(
            reply,
            "Sorry, the AI service is currently overloaded. Please try again in a few moments."
        );
        assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn other_errors_are_not_retried() {
        let generator = Replay::new(vec![Err(GenerateError::Failed("bad key".to_string()))]);
        let reply = generate_reply(&generator, "p", FAST).await;
        assert_eq!(reply, "Sorry, I encountered an error: bad key");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_key_generator_explains() {
        let reply = generate_reply(&MissingKeyGenerator::new("m"), "p", FAST).await;
        assert!(reply.contains("GOOGLE_API_KEY"));
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn gemini_generator_extracts_text() {
        let seen = Arc::new(Mutex::new(None));
        let seen_in_handler = seen.clone();
        let app = Router::new().route(
            "/models/{call}",
            post(move |Path(call): Path<String>, Json(body): Json<serde_json::Value>| {
                let seen = seen_in_handler.clone();
                async move {
                    *seen.lock().unwrap() = Some((call, body));
                    Json(json!({
                        "candidates": [{"content": {"parts": [{"text": "Hello "}, {"text": "there"}]}}]
                    }))
                }
            }),
        );
        let base = serve(app).await;

        let generator = GeminiGenerator::new(&base, "test-model", "k");
        assert_eq!(generator.generate("prompt").await.unwrap(), "Hello there");

        let (call, body) = seen.lock().unwrap().take().unwrap();
        assert_eq!(call, "test-model:generateContent");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "prompt");
    }

    #[tokio::test]
    async fn gemini_503_is_overload() {
        let app = Router::new().route(
            "/models/{call}",
            post(|| async { (HttpStatus::SERVICE_UNAVAILABLE, "busy").into_response() }),
        );
        let base = serve(app).await;
        let err = GeminiGenerator::new(&base, "m", "k").generate("p").await.unwrap_err();
        assert!(matches!(err, GenerateError::Overloaded(_)));
    }

    #[tokio::test]
    async fn gemini_other_status_is_failure() {
        let app = Router::new().route(
            "/models/{call}",
            post(|| async { (HttpStatus::FORBIDDEN, "API key not valid").into_response() }),
        );
        let base = serve(app).await;
        let err = GeminiGenerator::new(&base, "m", "k").generate("p").await.unwrap_err();
        assert!(matches!(err, GenerateError::Failed(_)));
    }
}
