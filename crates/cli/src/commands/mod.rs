//! Command implementations and shared wiring.

pub mod attendance;
pub mod auth;
pub mod members;

use std::path::PathBuf;

use thiserror::Error;

use flock_client::{
    ApiClient, ApiError, ClientConfig, ConfigError, SessionError, SessionManager,
};
use flock_core::{Role, User};

/// Errors surfaced to the terminal.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// A session operation failed; the message is user-facing.
    #[error("{0}")]
    Session(#[from] SessionError),

    /// A directory or attendance request failed.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// No stored session.
    #[error("not signed in (run `flock login` first)")]
    NotSignedIn,

    /// Action reserved for manager roles.
    #[error("this action requires a staff or pastor role")]
    NotManager,

    /// Unrecognized role argument.
    #[error("invalid role: {0}. Valid roles: pastor, staff, member, guest")]
    InvalidRole(String),
}

/// Shared command context: one API client and one session manager,
/// constructed once and passed into every command.
pub struct Context {
    pub api: ApiClient,
    pub session: SessionManager,
}

impl Context {
    /// Build the context from environment configuration.
    ///
    /// When no credential path is configured, falls back to
    /// `$HOME/.flock/tokens.json`; without a home directory the store runs
    /// disabled and the session will not survive the process.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] if the configured base address is
    /// invalid.
    pub fn from_env() -> Result<Self, CliError> {
        let mut config = ClientConfig::from_env()?;
        if config.token_path.is_none()
            && let Some(home) = std::env::var_os("HOME")
        {
            config = config.with_token_path(
                PathBuf::from(home).join(".flock").join("tokens.json"),
            );
        }

        let api = ApiClient::new(&config, config.token_store());
        let session = SessionManager::new(api.clone());

        Ok(Self { api, session })
    }

    /// Resolve the signed-in user, reloading the session from stored
    /// credentials.
    pub async fn current_user(&self) -> Result<User, CliError> {
        self.session.reload().await;
        self.session
            .state()
            .user()
            .cloned()
            .ok_or(CliError::NotSignedIn)
    }

    /// Resolve the signed-in user and require a manager role.
    pub async fn current_manager(&self) -> Result<User, CliError> {
        let user = self.current_user().await?;
        if user.role.is_some_and(Role::is_manager) {
            Ok(user)
        } else {
            Err(CliError::NotManager)
        }
    }
}
