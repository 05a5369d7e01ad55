//! Stylemate - AI outfit recommendations.
//!
//! A terminal chat client for an outfit recommendation service, plus the
//! service itself.
//!
//! Architecture:
//! - `chat`/`ask` drive a session store through the chat controller
//! - The controller sends each turn to the recommendation service over HTTP
//! - Table-shaped replies are rendered as outfit cards
//! - Login/signup go through an identity provider; the token is kept in ~/.stylemate

mod api;
mod auth;
mod cli;
mod client;
mod config;
mod controller;
mod error;
mod models;
mod outfit;
mod render;
mod server;
mod store;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{execute, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "stylemate=debug,tower_http=debug"
    } else {
        "stylemate=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    execute(cli).await
}
