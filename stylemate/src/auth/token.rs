//! Persisted client credentials.
//!
//! A small key-value file (`~/.stylemate/auth.json`). Presence of the
//! `authToken` key is what "logged in" means everywhere else.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use crate::config;

const AUTH_FILE: &str = "auth.json";
const AUTH_TOKEN_KEY: &str = "authToken";
const USER_NAME_KEY: &str = "userName";

/// File-backed store for the auth token and display name.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store at the default location in the stylemate home.
    pub fn open_default() -> Result<Self> {
        Ok(Self::at(config::home_dir()?.join(AUTH_FILE)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    fn write(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    /// Read-modify-write. An unreadable file is replaced rather than blocking the write.
    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let mut values = self.read().unwrap_or_else(|e| {
            warn!(error = %format!("{e:#}"), "Discarding unreadable credentials file");
            BTreeMap::new()
        });
        f(&mut values);
        self.write(&values)
    }

    pub fn auth_token(&self) -> Result<Option<String>> {
        Ok(self.read()?.remove(AUTH_TOKEN_KEY))
    }

    pub fn user_name(&self) -> Result<Option<String>> {
        Ok(self.read()?.remove(USER_NAME_KEY))
    }

    /// Whether an auth token is stored. Unreadable files count as logged out.
    pub fn is_authenticated(&self) -> bool {
        self.auth_token().ok().flatten().is_some()
    }

    pub fn set_auth_token(&self, token: &str) -> Result<()> {
        self.update(|values| {
            values.insert(AUTH_TOKEN_KEY.to_string(), token.to_string());
        })
    }

    pub fn set_user_name(&self, name: &str) -> Result<()> {
        self.update(|values| {
            values.insert(USER_NAME_KEY.to_string(), name.to_string());
        })
    }

    /// Remove the token and display name. An unreadable file is deleted.
    pub fn clear(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        match self.read() {
            Ok(mut values) => {
                values.remove(AUTH_TOKEN_KEY);
                values.remove(USER_NAME_KEY);
                self.write(&values)
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "Removing unreadable credentials file");
                std::fs::remove_file(&self.path)
                    .with_context(|| format!("Failed to remove {}", self.path.display()))
            }
        }
    }
}
