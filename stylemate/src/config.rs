//! Configuration loading.
//!
//! Configuration is loaded with the following precedence:
//! 1. Environment variables (`STYLEMATE_*`, plus `GOOGLE_API_KEY` for the server)
//! 2. Config file (`~/.stylemate/config.toml`)
//! 3. Defaults

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

/// Directory under the home directory holding config and credentials.
const HOME_DIR: &str = ".stylemate";
const CONFIG_FILE: &str = "config.toml";

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Recommendation service the chat client talks to.
    pub api: ApiConfig,
    /// Identity provider used for login and signup.
    pub auth: AuthConfig,
    /// Local recommendation server.
    pub server: ServerConfig,
}

/// Recommendation client configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL; requests go to `<base_url>/api/chat`.
    pub base_url: String,
    /// Upper bound on a single request.
    pub timeout_secs: u64,
}

const DEFAULT_TIMEOUT_SECS: u64 = 60;

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://style-mate-paxh.onrender.com".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Request timeout. Zero is not a usable bound and means the default.
    pub const fn timeout(&self) -> Duration {
        let secs = if self.timeout_secs == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            self.timeout_secs
        };
        Duration::from_secs(secs)
    }
}

/// Identity provider configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// REST base URL of the identity toolkit.
    pub base_url: String,
    /// Web API key of the project.
    pub api_key: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: "https://identitytoolkit.googleapis.com/v1".to_string(),
            api_key: None,
        }
    }
}

/// Recommendation server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Text generation model.
    pub model: String,
    /// Base URL of the generation API.
    pub generation_url: String,
    /// Generation API key.
    pub api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8001,
            model: "gemini-2.5-flash".to_string(),
            generation_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: None,
        }
    }
}

impl Config {
    /// Load from the default location, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&config_path()?)?;
        config.apply_env();
        Ok(config)
    }

    /// Load from a specific file; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    fn apply_env(&mut self) {
        if let Ok(url) = env::var("STYLEMATE_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(raw) = env::var("STYLEMATE_API_TIMEOUT") {
            match parse_timeout(&raw) {
                Some(secs) => self.api.timeout_secs = secs,
                None => warn!(value = %raw, "Ignoring invalid STYLEMATE_API_TIMEOUT"),
            }
        }
        if let Ok(key) = env::var("STYLEMATE_AUTH_API_KEY") {
            self.auth.api_key = Some(key);
        }
        if let Ok(key) = env::var("GOOGLE_API_KEY") {
            self.server.api_key = Some(key);
        }
    }
}

/// The stylemate home directory (`~/.stylemate`).
pub fn home_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(HOME_DIR))
}

/// Timeout override in whole seconds; must be positive.
fn parse_timeout(raw: &str) -> Option<u64> {
    raw.trim().parse().ok().filter(|&secs| secs > 0)
}

fn config_path() -> Result<PathBuf> {
    Ok(home_dir()?.join(CONFIG_FILE))
}
