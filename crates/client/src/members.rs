//! Member directory operations.
//!
//! Thin authed calls plus normalization. Failures here are surfaced to the
//! caller of the action and never touch session state.

use serde_json::{Value, json};

use flock_core::{Member, Role};

use crate::api::{ApiClient, ApiRequest};
use crate::error::ApiError;

impl ApiClient {
    /// List the member directory.
    ///
    /// Tolerates both response shapes the backend is known to produce (bare
    /// array, or object with an `items` array); anything else is an empty
    /// directory, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    pub async fn list_members(&self) -> Result<Vec<Member>, ApiError> {
        let body = self.execute(&ApiRequest::get("/members").authed()).await?;
        Ok(body.json().map(Member::list_from_value).unwrap_or_default())
    }

    /// Fetch one member by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    pub async fn get_member(&self, id: &str) -> Result<Member, ApiError> {
        let body = self
            .execute(&ApiRequest::get(format!("/members/{id}")).authed())
            .await?;
        Ok(Member::from_value(body.json().unwrap_or(&Value::Null)))
    }

    /// Change a member's role.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    pub async fn update_member_role(&self, id: &str, role: Role) -> Result<(), ApiError> {
        self.execute(
            &ApiRequest::patch(format!("/members/{id}"))
                .json(json!({ "role": role.as_str() }))
                .authed(),
        )
        .await?;
        Ok(())
    }
}
