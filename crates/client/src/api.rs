//! Request execution against the backend API.
//!
//! [`RequestExecutor`] performs a single HTTP call: resolves the path against
//! the configured base address, attaches bearer credentials when asked,
//! parses the body permissively and raises [`ApiError::RequestFailed`] for
//! non-success statuses.
//!
//! [`ApiClient`] layers one recovery step on top: a 401 on an authorized
//! request triggers exactly one refresh-and-retry cycle through the
//! [`RefreshCoordinator`] before giving up.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::instrument;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::refresh::RefreshCoordinator;
use crate::tokens::TokenStore;

/// Request timeout for every backend call.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

// ─────────────────────────────────────────────────────────────────────────────
// Request Description
// ─────────────────────────────────────────────────────────────────────────────

/// Body of an outgoing request.
#[derive(Debug, Clone)]
enum RequestBody {
    Json(Value),
    Form(Vec<(String, String)>),
}

/// Description of one API call.
///
/// Built with the `get`/`post`/`patch` constructors and chained builder
/// methods; executed (possibly twice, see [`ApiClient::execute`]) without
/// being consumed.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    headers: Vec<(String, String)>,
    body: Option<RequestBody>,
    pub(crate) auth: bool,
    pub(crate) retry_on_unauthorized: bool,
}

impl ApiRequest {
    /// A request with the given method and path.
    ///
    /// `path` is resolved against the configured base address unless it is
    /// already an absolute http(s) URL.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
            auth: false,
            retry_on_unauthorized: true,
        }
    }

    /// A GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// A PATCH request.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// Send `value` as a JSON body.
    #[must_use]
    pub fn json(mut self, value: Value) -> Self {
        self.body = Some(RequestBody::Json(value));
        self
    }

    /// Send the given pairs as a form-encoded body.
    #[must_use]
    pub fn form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = Some(RequestBody::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ));
        self
    }

    /// Add a header, overriding defaults of the same name.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach bearer credentials from the token store.
    #[must_use]
    pub const fn authed(mut self) -> Self {
        self.auth = true;
        self
    }

    /// Disable the 401 refresh-and-retry cycle for this request.
    #[must_use]
    pub const fn no_retry(mut self) -> Self {
        self.retry_on_unauthorized = false;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Response Body
// ─────────────────────────────────────────────────────────────────────────────

/// Permissively parsed response body.
///
/// JSON if parseable, else the raw text, else an explicit empty value. A
/// non-JSON body is not an error by itself; downstream normalization simply
/// finds no fields in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// The body parsed as JSON.
    Json(Value),
    /// The body was non-empty but not valid JSON.
    Text(String),
    /// The body was empty.
    Empty,
}

impl ResponseBody {
    /// The parsed JSON value, if the body was JSON.
    #[must_use]
    pub const fn json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The string `detail` field of a JSON object body, if present.
    fn detail(&self) -> Option<&str> {
        self.json()?.as_object()?.get("detail")?.as_str()
    }
}

fn parse_body(text: String) -> ResponseBody {
    if text.is_empty() {
        return ResponseBody::Empty;
    }
    serde_json::from_str::<Value>(&text)
        .map_or_else(|_| ResponseBody::Text(text), ResponseBody::Json)
}

fn failure_message(status: reqwest::StatusCode, body: &ResponseBody) -> String {
    body.detail()
        .map(str::to_owned)
        .or_else(|| status.canonical_reason().map(str::to_owned))
        .unwrap_or_else(|| "Request failed".to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Request Executor
// ─────────────────────────────────────────────────────────────────────────────

/// Performs single HTTP calls against the configured base address.
///
/// No recovery logic lives here; 401 handling belongs to [`ApiClient`].
#[derive(Clone)]
pub struct RequestExecutor {
    http: reqwest::Client,
    base_url: String,
    store: TokenStore,
}

impl RequestExecutor {
    /// Create an executor for the configured base address.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created. This should never happen
    /// under normal circumstances as we use standard TLS configuration.
    #[must_use]
    pub fn new(config: &ClientConfig, store: TokenStore) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: config.base_url.clone(),
            store,
        }
    }

    /// Execute one request.
    ///
    /// `bearer_override` replaces the stored access token for this call;
    /// the retry path uses it to attach a freshly refreshed token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::RequestFailed`] for non-success statuses and
    /// [`ApiError::Transport`] when the call could not complete.
    pub(crate) async fn send(
        &self,
        request: &ApiRequest,
        bearer_override: Option<&SecretString>,
    ) -> Result<ResponseBody, ApiError> {
        let url = self.resolve_url(&request.path);

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        // Caller headers replace defaults of the same name.
        for (name, value) in &request.headers {
            match (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::debug!(header = %name, "skipping invalid request header"),
            }
        }

        // Explicit bearer attachment takes precedence over caller headers.
        if request.auth {
            let bearer = bearer_override
                .cloned()
                .or_else(|| self.store.get().map(|tokens| tokens.access_token));
            if let Some(token) = bearer
                && let Ok(mut value) =
                    HeaderValue::try_from(format!("Bearer {}", token.expose_secret()))
            {
                value.set_sensitive(true);
                headers.insert(header::AUTHORIZATION, value);
            }
        }

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .headers(headers);

        builder = match &request.body {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Form(pairs)) => builder.form(pairs),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = parse_body(response.text().await?);

        if status.is_success() {
            Ok(body)
        } else {
            Err(ApiError::RequestFailed {
                status,
                message: failure_message(status, &body),
                body,
            })
        }
    }

    /// Resolve a path against the base address; absolute URLs pass through.
    fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authenticated Request Façade
// ─────────────────────────────────────────────────────────────────────────────

/// API client with bearer auth and 401 recovery.
///
/// Cheaply cloneable; all clones share the HTTP connection pool, the token
/// store and the single-flight refresh slot.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    executor: RequestExecutor,
    store: TokenStore,
    refresh: RefreshCoordinator,
}

impl ApiClient {
    /// Create a client for the configured base address, persisting
    /// credentials through `store`.
    #[must_use]
    pub fn new(config: &ClientConfig, store: TokenStore) -> Self {
        let executor = RequestExecutor::new(config, store.clone());
        let refresh = RefreshCoordinator::new(executor.clone(), store.clone());

        Self {
            inner: Arc::new(ApiClientInner {
                executor,
                store,
                refresh,
            }),
        }
    }

    /// The token store this client reads credentials from.
    #[must_use]
    pub fn store(&self) -> &TokenStore {
        &self.inner.store
    }

    /// Execute a request, recovering once from an expired access token.
    ///
    /// A 401 on an authorized request (unless the caller disabled retry)
    /// triggers a single refresh; with a fresh token the original request is
    /// repeated exactly once, itself with retry disabled. When refresh yields
    /// nothing, stored credentials are cleared and the original 401 error is
    /// surfaced.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::RequestFailed`] for non-success statuses and
    /// [`ApiError::Transport`] when the call could not complete.
    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    pub async fn execute(&self, request: &ApiRequest) -> Result<ResponseBody, ApiError> {
        match self.inner.executor.send(request, None).await {
            Err(err)
                if err.is_unauthorized() && request.auth && request.retry_on_unauthorized =>
            {
                if let Some(tokens) = self.inner.refresh.refresh().await {
                    tracing::debug!("access token refreshed, retrying request");
                    let retry = request.clone().no_retry();
                    self.inner
                        .executor
                        .send(&retry, Some(&tokens.access_token))
                        .await
                } else {
                    // Session is gone; nothing left worth keeping.
                    self.inner.store.clear();
                    Err(err)
                }
            }
            other => other,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;

    use super::*;

    fn executor(base: &str) -> RequestExecutor {
        let config = ClientConfig::new(base).unwrap();
        RequestExecutor::new(&config, TokenStore::in_memory())
    }

    #[test]
    fn test_resolve_url_joins_relative_paths() {
        let executor = executor("http://localhost:8000");
        assert_eq!(
            executor.resolve_url("/auth/login"),
            "http://localhost:8000/auth/login"
        );
        assert_eq!(
            executor.resolve_url("members"),
            "http://localhost:8000/members"
        );
    }

    #[test]
    fn test_resolve_url_passes_absolute_urls_through() {
        let executor = executor("http://localhost:8000");
        assert_eq!(
            executor.resolve_url("https://other.example.com/x"),
            "https://other.example.com/x"
        );
    }

    #[test]
    fn test_parse_body_json() {
        let body = parse_body("{\"a\": 1}".to_string());
        assert_eq!(body, ResponseBody::Json(json!({ "a": 1 })));
    }

    #[test]
    fn test_parse_body_falls_back_to_text() {
        let body = parse_body("<html>oops</html>".to_string());
        assert_eq!(body, ResponseBody::Text("<html>oops</html>".to_string()));
    }

    #[test]
    fn test_parse_body_empty() {
        assert_eq!(parse_body(String::new()), ResponseBody::Empty);
    }

    #[test]
    fn test_failure_message_prefers_detail() {
        let body = parse_body("{\"detail\": \"Invalid credentials\"}".to_string());
        assert_eq!(
            failure_message(StatusCode::UNAUTHORIZED, &body),
            "Invalid credentials"
        );
    }

    #[test]
    fn test_failure_message_ignores_non_string_detail() {
        let body = parse_body("{\"detail\": {\"code\": 3}}".to_string());
        assert_eq!(
            failure_message(StatusCode::UNAUTHORIZED, &body),
            "Unauthorized"
        );
    }

    #[test]
    fn test_failure_message_generic_fallback() {
        // 599 has no canonical reason phrase
        let status = StatusCode::from_u16(599).unwrap();
        assert_eq!(
            failure_message(status, &ResponseBody::Empty),
            "Request failed"
        );
    }

    #[test]
    fn test_request_defaults() {
        let request = ApiRequest::get("/members");
        assert!(!request.auth);
        assert!(request.retry_on_unauthorized);

        let request = ApiRequest::post("/auth/login").authed().no_retry();
        assert!(request.auth);
        assert!(!request.retry_on_unauthorized);
    }
}
