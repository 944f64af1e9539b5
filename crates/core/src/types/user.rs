//! The authenticated user.

use serde::Serialize;
use serde_json::Value;

use crate::normalize::{MEMBER_ID_ALIASES, MEMBER_NAME_ALIASES, first_id, first_string};

use super::Role;

/// Errors produced when a "who am I" payload cannot be normalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserFromValueError {
    /// The payload is not a JSON object.
    #[error("user payload is not an object")]
    NotAnObject,
    /// No identifier under any recognized alias.
    #[error("user payload has no id")]
    MissingId,
    /// No email address.
    #[error("user payload has no email")]
    MissingEmail,
}

/// The currently authenticated user, as reported by the `/auth/me` endpoint.
///
/// Unlike [`Member`](super::Member), a `User` requires an id and an email;
/// a payload missing either fails normalization rather than producing a
/// placeholder record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Backend identifier, coerced to a string.
    pub id: String,
    /// Email address.
    pub email: String,
    /// Display name, if the backend provided one.
    pub name: Option<String>,
    /// Role, absent when the backend reported none or an unrecognized one.
    pub role: Option<Role>,
}

impl User {
    /// Normalize a loosely-shaped `/auth/me` payload.
    ///
    /// # Errors
    ///
    /// Returns [`UserFromValueError`] when the payload is not an object or
    /// lacks an id or email.
    pub fn try_from_value(value: &Value) -> Result<Self, UserFromValueError> {
        let obj = value.as_object().ok_or(UserFromValueError::NotAnObject)?;

        let id = first_id(obj, MEMBER_ID_ALIASES).ok_or(UserFromValueError::MissingId)?;
        let email = first_string(obj, &["email"])
            .ok_or(UserFromValueError::MissingEmail)?
            .to_owned();
        let name = first_string(obj, MEMBER_NAME_ALIASES).map(str::to_owned);
        let role = first_string(obj, &["role"]).and_then(Role::parse);

        Ok(Self {
            id,
            email,
            name,
            role,
        })
    }
}
