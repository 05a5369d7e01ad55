//! Recommendation server.
//!
//! Implements the contract the chat client talks to, backed by a text
//! generation model.
//!
//! Endpoints:
//! - GET / - Service info
//! - POST /api/chat - Generate outfit suggestions for a message
//! - GET /messages - Messages received since startup

mod generator;
mod prompt;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::api::{ChatRequest, ChatResponse};
use crate::config::ServerConfig;
use crate::models::StylePreference;

pub use generator::{
    generate_reply, GeminiGenerator, MissingKeyGenerator, RetryPolicy, TextGenerator,
};
pub use prompt::build_prompt;

/// Gender assumed when a request omits it.
const DEFAULT_GENDER: &str = "men";

/// A request as received, kept for `GET /messages`.
#[derive(Clone, Debug, Serialize)]
pub struct ReceivedMessage {
    pub message: String,
    pub gender: String,
}

/// Shared server state.
pub struct ServerState {
    generator: Arc<dyn TextGenerator>,
    retry: RetryPolicy,
    received: RwLock<Vec<ReceivedMessage>>,
}

impl ServerState {
    pub fn new(generator: Arc<dyn TextGenerator>, retry: RetryPolicy) -> Self {
        Self {
            generator,
            retry,
            received: RwLock::new(Vec::new()),
        }
    }
}

#[derive(Debug, Serialize)]
struct RootResponse {
    message: &'static str,
    endpoints: &'static [&'static str],
    ai_model: String,
}

#[derive(Debug, Serialize)]
struct MessagesResponse {
    total: usize,
    messages: Vec<ReceivedMessage>,
}

/// Build the router over shared state.
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/api/chat", post(chat_handler))
        .route("/messages", get(messages_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the server and serve until shutdown.
pub async fn start_server(config: &ServerConfig, host: [u8; 4], open_browser: bool) -> Result<()> {
    let generator: Arc<dyn TextGenerator> = match GeminiGenerator::from_config(config) {
        Some(g) => Arc::new(g),
        None => {
            warn!("GOOGLE_API_KEY is not set; chat replies will explain the missing key");
            Arc::new(MissingKeyGenerator::new(config.model.clone()))
        }
    };
    let state = Arc::new(ServerState::new(generator, RetryPolicy::default()));
    let app = router(state);

    let addr = SocketAddr::from((host, config.port));
    info!(%addr, model = %config.model, "Starting recommendation server");
    println!("Stylemate server starting on http://{addr}");
    println!("API endpoint: http://{addr}/api/chat");

    if open_browser {
        let _ = open::that(format!("http://{addr}"));
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

// === Handlers ===

async fn root_handler(State(state): State<Arc<ServerState>>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "Style Mate assistant API is running!",
        endpoints: &["/api/chat"],
        ai_model: state.generator.model().to_string(),
    })
}

async fn chat_handler(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Json<ChatResponse> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected chat request");
            return Json(ChatResponse::error(rejection.body_text()));
        }
    };

    if req.message.is_empty() {
        return Json(ChatResponse::error("No message provided"));
    }

    let gender = req.gender.unwrap_or_else(|| DEFAULT_GENDER.to_string());
    info!(gender = %gender, "Received chat message");
    state.received.write().await.push(ReceivedMessage {
        message: req.message.clone(),
        gender: gender.clone(),
    });

    let prompt = build_prompt(&req.message, StylePreference::from_wire(&gender));
    let reply = generate_reply(state.generator.as_ref(), &prompt, state.retry).await;
    Json(ChatResponse::success(reply))
}

async fn messages_handler(State(state): State<Arc<ServerState>>) -> Json<MessagesResponse> {
    let messages = state.received.read().await.clone();
    Json(MessagesResponse {
        total: messages.len(),
        messages,
    })
}
