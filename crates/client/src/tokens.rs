//! Credential pair and durable token storage.
//!
//! The backend issues an opaque bearer access token and, usually, a refresh
//! token. The pair is persisted wholesale in a per-client credential file so
//! the session survives restarts, and deleted entirely on logout or when a
//! refresh attempt establishes that the session is gone.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use flock_core::normalize::TokenFields;

/// A credential pair: bearer access token plus optional refresh token.
///
/// Never constructed with an empty access token; [`TokenStore::get`] treats
/// an empty stored access token as "no credentials".
#[derive(Clone)]
pub struct AuthTokens {
    /// Short-lived bearer credential attached to authorized requests.
    pub access_token: SecretString,
    /// Longer-lived credential exchanged for a new access token.
    pub refresh_token: Option<SecretString>,
}

impl AuthTokens {
    /// Build a pair from extracted wire fields.
    #[must_use]
    pub fn from_fields(fields: TokenFields) -> Self {
        Self {
            access_token: SecretString::from(fields.access_token),
            refresh_token: fields.refresh_token.map(SecretString::from),
        }
    }
}

impl fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthTokens")
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// On-disk format of the credential file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredTokens {
    access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
}

impl StoredTokens {
    fn from_auth(tokens: &AuthTokens) -> Self {
        Self {
            access_token: tokens.access_token.expose_secret().to_string(),
            refresh_token: tokens
                .refresh_token
                .as_ref()
                .map(|t| t.expose_secret().to_string()),
        }
    }

    fn into_auth(self) -> Option<AuthTokens> {
        if self.access_token.is_empty() {
            return None;
        }
        Some(AuthTokens {
            access_token: SecretString::from(self.access_token),
            refresh_token: self.refresh_token.map(SecretString::from),
        })
    }
}

enum Backend {
    /// JSON credential file at a fixed path.
    File(PathBuf),
    /// Process-local storage, used by tests and ad-hoc consumers.
    Memory(RwLock<Option<StoredTokens>>),
    /// No durable storage available: reads are absent, writes are dropped.
    Disabled,
}

/// Durable, synchronous storage for the credential pair.
///
/// A pure accessor with no business logic: `put` writes exactly the pair it
/// is given (callers carry forward an old refresh token themselves), `get`
/// returns absent rather than a pair without an access token, and every
/// operation is safe to call when no durable storage is available. I/O
/// failures degrade to the disabled behavior instead of propagating.
#[derive(Clone)]
pub struct TokenStore {
    backend: Arc<Backend>,
}

impl TokenStore {
    /// Store credentials in a JSON file at `path`.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: Arc::new(Backend::File(path.into())),
        }
    }

    /// Store credentials in process memory only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            backend: Arc::new(Backend::Memory(RwLock::new(None))),
        }
    }

    /// A store with no durable storage: `get` returns absent and
    /// `put`/`clear` are no-ops.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            backend: Arc::new(Backend::Disabled),
        }
    }

    /// Read the stored credential pair.
    ///
    /// Returns `None` when nothing is stored or the stored access token is
    /// empty, even if a refresh token happens to be present.
    #[must_use]
    pub fn get(&self) -> Option<AuthTokens> {
        match self.backend.as_ref() {
            Backend::File(path) => read_file(path).and_then(StoredTokens::into_auth),
            Backend::Memory(slot) => slot
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
                .and_then(StoredTokens::into_auth),
            Backend::Disabled => None,
        }
    }

    /// Overwrite the stored credential pair wholesale.
    pub fn put(&self, tokens: &AuthTokens) {
        let stored = StoredTokens::from_auth(tokens);
        match self.backend.as_ref() {
            Backend::File(path) => write_file(path, &stored),
            Backend::Memory(slot) => {
                *slot.write().unwrap_or_else(PoisonError::into_inner) = Some(stored);
            }
            Backend::Disabled => {}
        }
    }

    /// Delete the stored credential pair.
    pub fn clear(&self) {
        match self.backend.as_ref() {
            Backend::File(path) => {
                if let Err(err) = std::fs::remove_file(path)
                    && err.kind() != std::io::ErrorKind::NotFound
                {
                    tracing::debug!(path = %path.display(), error = %err, "failed to remove credential file");
                }
            }
            Backend::Memory(slot) => {
                *slot.write().unwrap_or_else(PoisonError::into_inner) = None;
            }
            Backend::Disabled => {}
        }
    }
}

fn read_file(path: &Path) -> Option<StoredTokens> {
    let text = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&text) {
        Ok(stored) => Some(stored),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "credential file is malformed");
            None
        }
    }
}

fn write_file(path: &Path, stored: &StoredTokens) {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && let Err(err) = std::fs::create_dir_all(parent)
    {
        tracing::debug!(path = %path.display(), error = %err, "failed to create credential directory");
        return;
    }

    match serde_json::to_string_pretty(stored) {
        Ok(json) => {
            if let Err(err) = std::fs::write(path, json) {
                tracing::debug!(path = %path.display(), error = %err, "failed to write credential file");
            }
        }
        Err(err) => {
            tracing::debug!(error = %err, "failed to serialize credentials");
        }
    }
}
