//! Flock Client - API client for the membership/attendance backend.
//!
//! This crate holds everything the front end needs to talk to the backend:
//!
//! - [`config`] - Base address and token-path configuration from environment
//! - [`tokens`] - Durable credential storage ([`TokenStore`])
//! - [`api`] - Request execution with bearer auth and 401 recovery
//!   ([`ApiClient`])
//! - [`refresh`] - Single-flight token refresh ([`RefreshCoordinator`])
//! - [`session`] - Login/registration/logout state machine
//!   ([`SessionManager`])
//!
//! Directory and attendance operations live on [`ApiClient`] as thin authed
//! calls; their failures never affect session state.
//!
//! # Architecture
//!
//! ```text
//! SessionManager ──► ApiClient ──► RefreshCoordinator
//!       │                │                │
//!       └────────────────┴───► TokenStore ┘
//! ```
//!
//! The session manager is an explicit context object constructed once by the
//! application and injected into every consumer; state changes are published
//! through a watch channel.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod refresh;
pub mod session;
pub mod tokens;

mod attendance;
mod members;

pub use api::{ApiClient, ApiRequest, RequestExecutor, ResponseBody};
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, SessionError};
pub use refresh::RefreshCoordinator;
pub use session::{RegisterInput, SessionManager, SessionState};
pub use tokens::{AuthTokens, TokenStore};
