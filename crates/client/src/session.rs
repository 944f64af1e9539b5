//! Session state machine: login, registration, logout, reload.
//!
//! [`SessionManager`] is an explicit context object: the application builds
//! one at startup and injects it into every consumer. State changes are
//! published through a watch channel; consumers call [`SessionManager::subscribe`]
//! and render whatever state arrives. The machine cycles between
//! `Authenticated` and `Unauthenticated` for the life of the process;
//! `Loading` is only ever transient.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value, json};
use tokio::sync::watch;
use tracing::instrument;

use flock_core::User;
use flock_core::normalize::extract_token_fields;

use crate::api::{ApiClient, ApiRequest, ResponseBody};
use crate::error::{ApiError, SessionError};
use crate::tokens::{AuthTokens, TokenStore};

/// Current session state.
///
/// The user is carried inside `Authenticated`, so "user present if and only
/// if authenticated" holds by construction.
#[derive(Debug, Clone)]
pub enum SessionState {
    /// A session operation is in progress.
    Loading,
    /// Logged in as the carried user.
    Authenticated(User),
    /// No valid session.
    Unauthenticated,
}

impl SessionState {
    /// The current user, when authenticated.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Whether the session is authenticated.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Input for [`SessionManager::register`].
pub struct RegisterInput {
    /// Optional display name.
    pub name: Option<String>,
    /// Email address; doubles as the login identifier.
    pub email: String,
    /// Password.
    pub password: SecretString,
}

/// Drives login, registration, logout and session reload.
///
/// Cheaply cloneable; all clones share one state channel, so there is a
/// single writer of session state per running client.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    api: ApiClient,
    store: TokenStore,
    state: watch::Sender<SessionState>,
}

impl SessionManager {
    /// Create a session manager over `api`, starting in `Loading`.
    ///
    /// Callers are expected to invoke [`reload`](Self::reload) once at
    /// startup to resolve the initial state.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let store = api.store().clone();
        let (state, _) = watch::channel(SessionState::Loading);

        Self {
            inner: Arc::new(SessionInner { api, store, state }),
        }
    }

    /// The current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to session state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    fn set_state(&self, state: SessionState) {
        self.inner.state.send_replace(state);
    }

    /// Resolve the session from stored credentials.
    ///
    /// With no stored credentials the session is `Unauthenticated`
    /// immediately. Otherwise the authenticated "who am I" endpoint decides:
    /// success yields `Authenticated`, any failure clears stored credentials
    /// and yields `Unauthenticated`. Never returns an error.
    #[instrument(skip_all)]
    pub async fn reload(&self) {
        if self.inner.store.get().is_none() {
            self.set_state(SessionState::Unauthenticated);
            return;
        }

        let request = ApiRequest::get("/auth/me").authed();
        let user = match self.inner.api.execute(&request).await {
            Ok(ResponseBody::Json(value)) => User::try_from_value(&value).map_err(ApiError::from),
            Ok(_) => Err(ApiError::from(
                flock_core::UserFromValueError::NotAnObject,
            )),
            Err(err) => Err(err),
        };

        match user {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, "session resolved");
                self.set_state(SessionState::Authenticated(user));
            }
            Err(err) => {
                tracing::debug!(error = %err, "session reload failed");
                self.inner.store.clear();
                self.set_state(SessionState::Unauthenticated);
            }
        }
    }

    /// Log in with email and password.
    ///
    /// The backend's login contract is not assumed fixed-shape: up to three
    /// encodings of the same credentials are tried in order (form fields,
    /// JSON with `username`, JSON with `email`), stopping at the first that
    /// yields a recognizable credential pair. On success the pair is
    /// persisted and the session reloaded.
    ///
    /// # Errors
    ///
    /// When every encoding fails, stored credentials are cleared, the
    /// session becomes `Unauthenticated`, and the LAST attempt's error is
    /// returned - whatever its kind, including a response that parsed but
    /// contained no recognizable tokens.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<(), SessionError> {
        self.set_state(SessionState::Loading);

        match self.request_login_tokens(email, password).await {
            Ok(tokens) => {
                self.inner.store.put(&tokens);
                self.reload().await;
                Ok(())
            }
            Err(err) => {
                self.inner.store.clear();
                self.set_state(SessionState::Unauthenticated);
                Err(SessionError::from(err))
            }
        }
    }

    /// Register a new account, then establish a session.
    ///
    /// When the registration response itself carries a credential pair it is
    /// persisted directly; otherwise the full login flow runs with the
    /// just-registered credentials.
    ///
    /// # Errors
    ///
    /// Same failure handling as [`login`](Self::login).
    #[instrument(skip_all, fields(email = %input.email))]
    pub async fn register(&self, input: &RegisterInput) -> Result<(), SessionError> {
        self.set_state(SessionState::Loading);

        let mut body = Map::new();
        if let Some(name) = &input.name {
            body.insert("name".to_string(), Value::String(name.clone()));
        }
        body.insert("email".to_string(), Value::String(input.email.clone()));
        body.insert(
            "password".to_string(),
            Value::String(input.password.expose_secret().to_string()),
        );

        let request = ApiRequest::post("/auth/register")
            .json(Value::Object(body))
            .no_retry();

        let tokens = match self.inner.api.execute(&request).await {
            Ok(body) => match body.json().and_then(extract_token_fields) {
                Some(fields) => Ok(AuthTokens::from_fields(fields)),
                // Registration succeeded without tokens; log in normally.
                None => {
                    self.request_login_tokens(&input.email, &input.password)
                        .await
                }
            },
            Err(err) => Err(err),
        };

        match tokens {
            Ok(tokens) => {
                self.inner.store.put(&tokens);
                self.reload().await;
                Ok(())
            }
            Err(err) => {
                self.inner.store.clear();
                self.set_state(SessionState::Unauthenticated);
                Err(SessionError::from(err))
            }
        }
    }

    /// Log out: clear stored credentials and drop the user.
    ///
    /// Synchronous; no network call.
    pub fn logout(&self) {
        self.inner.store.clear();
        self.set_state(SessionState::Unauthenticated);
    }

    /// Try the three login encodings in order; first extractable pair wins.
    async fn request_login_tokens(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthTokens, ApiError> {
        let attempts = [
            ApiRequest::post("/auth/login")
                .form([("username", email), ("password", password.expose_secret())])
                .no_retry(),
            ApiRequest::post("/auth/login")
                .json(json!({ "username": email, "password": password.expose_secret() }))
                .no_retry(),
            ApiRequest::post("/auth/login")
                .json(json!({ "email": email, "password": password.expose_secret() }))
                .no_retry(),
        ];

        let mut last_error = ApiError::MissingTokens;

        for request in &attempts {
            match self.inner.api.execute(request).await {
                Ok(body) => match body.json().and_then(extract_token_fields) {
                    Some(fields) => return Ok(AuthTokens::from_fields(fields)),
                    None => last_error = ApiError::MissingTokens,
                },
                Err(err) => last_error = err,
            }
        }

        Err(last_error)
    }
}
