//! Error types for the API client and the session boundary.
//!
//! [`ApiError`] is the typed failure of a single request; callers inspect its
//! kind (and, for [`ApiError::RequestFailed`], the status and raw body).
//! [`SessionError`] is the session manager's boundary type: its `Display` is
//! the short, human-readable message the view layer shows to the user.

use reqwest::StatusCode;
use thiserror::Error;

use crate::api::ResponseBody;

/// Errors that can occur when executing a request against the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP response received with a non-success status.
    ///
    /// `message` is the string `detail` field of a JSON object body if there
    /// is one, else the status's canonical reason, else "Request failed".
    #[error("{message}")]
    RequestFailed {
        /// Response status code.
        status: StatusCode,
        /// Best-effort human-readable message.
        message: String,
        /// Raw parsed body, for caller inspection.
        body: ResponseBody,
    },

    /// The call could not complete at all (connectivity, DNS, TLS).
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response that should contain tokens did not, under any recognized
    /// alias.
    #[error("response did not include tokens")]
    MissingTokens,

    /// A "who am I" payload could not be normalized into a user.
    #[error("invalid user payload: {0}")]
    InvalidUser(#[from] flock_core::UserFromValueError),
}

impl ApiError {
    /// The response status, when an HTTP response was received.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this failure is a 401 that the refresh-and-retry path may
    /// recover from.
    #[must_use]
    pub(crate) fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::RequestFailed {
                status: StatusCode::UNAUTHORIZED,
                ..
            }
        )
    }
}

/// Failure of a session operation (login, registration).
///
/// The session manager is the boundary that converts request failures into a
/// state transition plus this error; the `Display` output is safe to show to
/// the end user.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SessionError(#[from] pub ApiError);

impl SessionError {
    /// The underlying request failure.
    #[must_use]
    pub const fn api_error(&self) -> &ApiError {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failed_display_is_message() {
        let err = ApiError::RequestFailed {
            status: StatusCode::FORBIDDEN,
            message: "Not allowed".to_string(),
            body: ResponseBody::Empty,
        };
        assert_eq!(err.to_string(), "Not allowed");
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    }

    #[test]
    fn test_only_unauthorized_is_recoverable() {
        let unauthorized = ApiError::RequestFailed {
            status: StatusCode::UNAUTHORIZED,
            message: "Unauthorized".to_string(),
            body: ResponseBody::Empty,
        };
        let forbidden = ApiError::RequestFailed {
            status: StatusCode::FORBIDDEN,
            message: "Forbidden".to_string(),
            body: ResponseBody::Empty,
        };

        assert!(unauthorized.is_unauthorized());
        assert!(!forbidden.is_unauthorized());
        assert!(!ApiError::MissingTokens.is_unauthorized());
    }

    #[test]
    fn test_session_error_display_passes_message_through() {
        let err = SessionError::from(ApiError::MissingTokens);
        assert_eq!(err.to_string(), "response did not include tokens");
    }
}
