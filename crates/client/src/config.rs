//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `FLOCK_API_BASE_URL` - Backend base address (default: `http://localhost:8000`)
//! - `FLOCK_TOKEN_PATH` - Path of the credential file; when unset, no durable
//!   storage is used and the session does not survive the process

use std::path::PathBuf;

use thiserror::Error;

use crate::tokens::TokenStore;

/// Default backend address for local development.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid base URL {0}: {1}")]
    InvalidBaseUrl(String, url::ParseError),
    #[error("Base URL {0} must use http or https")]
    UnsupportedScheme(String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base address, trailing slashes stripped.
    pub base_url: String,
    /// Path of the credential file, if durable storage is available.
    pub token_path: Option<PathBuf>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configured base address is not a valid
    /// http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let raw = get_env_or_default("FLOCK_API_BASE_URL", DEFAULT_API_BASE_URL);
        let base_url = normalize_base_url(&raw)?;
        let token_path = get_optional_env("FLOCK_TOKEN_PATH").map(PathBuf::from);

        Ok(Self {
            base_url,
            token_path,
        })
    }

    /// Build a configuration for a known base address, without touching the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not a valid http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            token_path: None,
        })
    }

    /// Use the given credential file path.
    #[must_use]
    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = Some(path.into());
        self
    }

    /// Create the token store this configuration describes.
    ///
    /// Without a token path the store runs disabled: reads are absent and
    /// writes are dropped, never failing.
    #[must_use]
    pub fn token_store(&self) -> TokenStore {
        self.token_path
            .as_ref()
            .map_or_else(TokenStore::disabled, TokenStore::file)
    }
}

/// Validate the base address and strip trailing slashes.
fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim_end_matches('/');

    let url = url::Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidBaseUrl(raw.to_string(), e))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::UnsupportedScheme(raw.to_string()));
    }

    Ok(trimmed.to_string())
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
