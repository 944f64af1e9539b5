//! Directory entries.

use serde::Serialize;
use serde_json::Value;

use crate::normalize::{
    FALLBACK_NAME, MEMBER_ID_ALIASES, MEMBER_NAME_ALIASES, first_id, first_string, member_items,
};

use super::Role;

/// One entry in the member directory.
///
/// Normalization is total: any payload produces a `Member`, with absent
/// fields resolved through the alias tables in [`crate::normalize`]. A
/// record without any usable identifier gets an empty `id`; the view layer
/// treats such entries as non-navigable rather than crashing on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    /// Backend identifier, coerced to a string. Empty when absent.
    pub id: String,
    /// Display name, falling back to the email and then to `"Unknown"`.
    pub name: String,
    /// Email address, if present.
    pub email: Option<String>,
    /// Role, absent when the backend reported none or an unrecognized one.
    pub role: Option<Role>,
}

impl Member {
    /// Normalize one loosely-shaped member record.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self {
                id: String::new(),
                name: FALLBACK_NAME.to_owned(),
                email: None,
                role: None,
            };
        };

        let id = first_id(obj, MEMBER_ID_ALIASES).unwrap_or_default();
        let email = first_string(obj, &["email"]).map(str::to_owned);
        let name = first_string(obj, MEMBER_NAME_ALIASES)
            .map(str::to_owned)
            .or_else(|| email.clone())
            .unwrap_or_else(|| FALLBACK_NAME.to_owned());
        let role = first_string(obj, &["role"]).and_then(Role::parse);

        Self {
            id,
            name,
            email,
            role,
        }
    }

    /// Normalize a member-list response body (bare array or `items` object).
    #[must_use]
    pub fn list_from_value(value: &Value) -> Vec<Self> {
        member_items(value).iter().map(Self::from_value).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_member_full_name_alias() {
        let member = Member::from_value(&json!({
            "member_id": 7,
            "full_name": "A",
        }));

        assert_eq!(member.id, "7");
        assert_eq!(member.name, "A");
        assert_eq!(member.email, None);
        assert_eq!(member.role, None);
    }

    #[test]
    fn test_member_name_priority_over_aliases() {
        let member = Member::from_value(&json!({
            "id": "1",
            "full_name": "Full",
            "display_name": "Display",
        }));
        assert_eq!(member.name, "Full");
    }

    #[test]
    fn test_member_name_falls_back_to_email() {
        let member = Member::from_value(&json!({
            "id": "1",
            "email": "a@example.com",
        }));
        assert_eq!(member.name, "a@example.com");
    }

    #[test]
    fn test_member_name_literal_fallback() {
        let member = Member::from_value(&json!({ "id": "1" }));
        assert_eq!(member.name, "Unknown");
    }

    #[test]
    fn test_member_unknown_role_dropped() {
        let member = Member::from_value(&json!({
            "id": "1",
            "name": "A",
            "role": "admin",
        }));
        assert_eq!(member.role, None);
    }

    #[test]
    fn test_member_from_non_object() {
        let member = Member::from_value(&json!(42));
        assert_eq!(member.id, "");
        assert_eq!(member.name, "Unknown");
    }

    #[test]
    fn test_list_from_items_object() {
        let members = Member::list_from_value(&json!({
            "items": [{ "id": 7, "full_name": "A" }],
        }));

        assert_eq!(members.len(), 1);
        assert_eq!(members.first().map(|m| m.id.as_str()), Some("7"));
        assert_eq!(members.first().map(|m| m.name.as_str()), Some("A"));
    }

    #[test]
    fn test_list_from_bare_array() {
        let members = Member::list_from_value(&json!([{ "id": 1 }, { "id": 2 }]));
        assert_eq!(members.len(), 2);
    }
}
