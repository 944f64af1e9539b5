//! Attendance check-in/check-out.

use serde_json::json;

use crate::api::{ApiClient, ApiRequest};
use crate::error::ApiError;

impl ApiClient {
    /// Record a check-in, for the current user or (managers only, enforced
    /// server-side) for the given member.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    pub async fn check_in(&self, member_id: Option<&str>) -> Result<(), ApiError> {
        self.post_attendance("/attendance/check-in", member_id).await
    }

    /// Record a check-out.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    pub async fn check_out(&self, member_id: Option<&str>) -> Result<(), ApiError> {
        self.post_attendance("/attendance/check-out", member_id).await
    }

    async fn post_attendance(&self, path: &str, member_id: Option<&str>) -> Result<(), ApiError> {
        let body = member_id.map_or_else(|| json!({}), |id| json!({ "member_id": id }));
        self.execute(&ApiRequest::post(path).json(body).authed())
            .await?;
        Ok(())
    }
}
