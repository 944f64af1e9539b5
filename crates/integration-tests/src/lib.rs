//! Integration tests for Flock.
//!
//! Every test runs the real client against a per-test wiremock server, so
//! the full stack - request execution, bearer attachment, single-flight
//! refresh, session state machine - is exercised over actual HTTP.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p flock-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session_flow` - Login encodings, registration, reload, logout
//! - `token_refresh` - Single-flight refresh, retry-once, credential merge
//! - `request_execution` - Header assembly and precedence
//! - `directory` - Member/attendance calls and payload normalization

use secrecy::SecretString;

use flock_client::{ApiClient, AuthTokens, ClientConfig, TokenStore};

/// Build a client against a wiremock server with an in-memory token store.
///
/// # Panics
///
/// Panics when `base_url` is not a valid http(s) URL, which in these tests
/// means the mock server failed to start.
#[must_use]
pub fn test_client(base_url: &str) -> (ApiClient, TokenStore) {
    let config = ClientConfig::new(base_url).expect("mock server URL should be valid");
    let store = TokenStore::in_memory();
    (ApiClient::new(&config, store.clone()), store)
}

/// A credential pair for seeding the store.
#[must_use]
pub fn tokens(access: &str, refresh: Option<&str>) -> AuthTokens {
    AuthTokens {
        access_token: SecretString::from(access),
        refresh_token: refresh.map(SecretString::from),
    }
}
