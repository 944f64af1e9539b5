//! Single-flight token refresh.
//!
//! Any number of requests can hit a 401 at the same moment; only one refresh
//! call may reach the backend. The coordinator keeps a mutex-guarded slot
//! holding the in-flight operation as a shared future: the first caller
//! populates it, every concurrent caller awaits the same eventual result,
//! and the slot is cleared exactly once when the operation settles. The
//! operation itself is spawned on the runtime, so it runs to completion even
//! if every caller loses interest.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::instrument;

use flock_core::normalize::extract_token_fields;

use crate::api::{ApiRequest, RequestExecutor};
use crate::tokens::{AuthTokens, TokenStore};

type RefreshFuture = Shared<BoxFuture<'static, Option<AuthTokens>>>;

/// Guarantees at most one refresh operation in flight process-wide.
#[derive(Clone)]
pub struct RefreshCoordinator {
    inner: Arc<RefreshInner>,
}

struct RefreshInner {
    executor: RequestExecutor,
    store: TokenStore,
    in_flight: Mutex<Option<RefreshFuture>>,
}

impl RefreshCoordinator {
    /// Create a coordinator refreshing through `executor` and persisting
    /// through `store`.
    #[must_use]
    pub fn new(executor: RequestExecutor, store: TokenStore) -> Self {
        Self {
            inner: Arc::new(RefreshInner {
                executor,
                store,
                in_flight: Mutex::new(None),
            }),
        }
    }

    /// Exchange the stored refresh token for a fresh credential pair.
    ///
    /// Returns `None` - without any network call - when no refresh token is
    /// stored, and `None` when the backend rejects the exchange or returns
    /// nothing recognizable; the caller treats that as "session is gone".
    /// This path never triggers another refresh and never errors.
    #[instrument(skip_all)]
    pub async fn refresh(&self) -> Option<AuthTokens> {
        let refresh_token = self.inner.store.get()?.refresh_token?;

        let operation = {
            let mut slot = self.inner.in_flight.lock().await;
            if let Some(operation) = slot.as_ref() {
                tracing::debug!("refresh already in flight, awaiting shared result");
                operation.clone()
            } else {
                let task = tokio::spawn(run_refresh(self.inner.clone(), refresh_token));
                let operation: RefreshFuture = async move {
                    task.await.unwrap_or_else(|err| {
                        tracing::debug!(error = %err, "refresh task failed");
                        None
                    })
                }
                .boxed()
                .shared();
                *slot = Some(operation.clone());
                operation
            }
        };

        operation.await
    }
}

/// The spawned refresh operation: performs the exchange, then clears the
/// in-flight slot regardless of outcome so a later call can start a new
/// attempt.
async fn run_refresh(inner: Arc<RefreshInner>, refresh_token: SecretString) -> Option<AuthTokens> {
    let result = perform_refresh(&inner.executor, &inner.store, &refresh_token).await;
    *inner.in_flight.lock().await = None;
    result
}

async fn perform_refresh(
    executor: &RequestExecutor,
    store: &TokenStore,
    refresh_token: &SecretString,
) -> Option<AuthTokens> {
    let request = ApiRequest::post("/auth/refresh")
        .json(json!({ "refresh_token": refresh_token.expose_secret() }))
        .no_retry();

    let body = match executor.send(&request, None).await {
        Ok(body) => body,
        Err(err) => {
            tracing::debug!(error = %err, "token refresh rejected");
            return None;
        }
    };

    let fields = body.json().and_then(extract_token_fields)?;

    // Keep the prior refresh token when the server omits a new one.
    let merged = AuthTokens {
        access_token: SecretString::from(fields.access_token),
        refresh_token: fields
            .refresh_token
            .map(SecretString::from)
            .or_else(|| Some(refresh_token.clone())),
    };

    store.put(&merged);
    store.get()
}
