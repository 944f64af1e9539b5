//! Ordered field-alias resolution for loosely-shaped backend payloads.
//!
//! The backend's field naming is not guaranteed stable: the same logical
//! field arrives under different names depending on the endpoint and backend
//! version. Each logical field therefore has an ordered alias table; the
//! first alias that is present and non-empty wins. The tables are data, not
//! branching code, so the priority order is trivially testable and
//! extendable.

use serde_json::{Map, Value};

/// Aliases for the access-token field of auth responses, in priority order.
pub const ACCESS_TOKEN_ALIASES: &[&str] = &["access_token", "accessToken", "access", "token"];

/// Aliases for the refresh-token field of auth responses, in priority order.
pub const REFRESH_TOKEN_ALIASES: &[&str] = &["refresh_token", "refreshToken", "refresh"];

/// Aliases for a member's identifier, in priority order.
pub const MEMBER_ID_ALIASES: &[&str] = &["id", "member_id", "uuid"];

/// Aliases for a member's display name, in priority order.
///
/// When none match, callers fall back to the email and then to
/// [`FALLBACK_NAME`].
pub const MEMBER_NAME_ALIASES: &[&str] = &["name", "full_name", "display_name"];

/// Literal name used when a member record carries no usable name or email.
pub const FALLBACK_NAME: &str = "Unknown";

/// Resolve the first alias whose value is a non-empty string.
#[must_use]
pub fn first_string<'a>(obj: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a str> {
    aliases.iter().find_map(|key| match obj.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    })
}

/// Resolve the first alias whose value is a non-empty string or a finite
/// number, coerced to a string.
///
/// Identifiers in particular arrive as either JSON strings or numbers.
#[must_use]
pub fn first_id(obj: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|key| match obj.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// A credential pair extracted from an auth response, still as plain wire
/// strings. The client crate wraps these in secret types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenFields {
    /// Opaque bearer value. Never empty.
    pub access_token: String,
    /// Optional longer-lived credential for obtaining new access tokens.
    pub refresh_token: Option<String>,
}

/// Extract a credential pair from a login/register/refresh response body.
///
/// Returns `None` unless the body is a JSON object containing a non-empty
/// access token under one of the recognized aliases. A missing refresh token
/// is not an error.
#[must_use]
pub fn extract_token_fields(value: &Value) -> Option<TokenFields> {
    let obj = value.as_object()?;
    let access_token = first_string(obj, ACCESS_TOKEN_ALIASES)?.to_owned();
    let refresh_token = first_string(obj, REFRESH_TOKEN_ALIASES).map(str::to_owned);

    Some(TokenFields {
        access_token,
        refresh_token,
    })
}

/// Unwrap a member-list response body into its element slice.
///
/// The backend returns either a bare array or an object with an `items`
/// array. Anything else normalizes to an empty list.
#[must_use]
pub fn member_items(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items,
        Value::Object(obj) => match obj.get("items") {
            Some(Value::Array(items)) => items,
            _ => &[],
        },
        _ => &[],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_first_string_priority_order() {
        let value = json!({
            "full_name": "A",
            "display_name": "B",
        });
        let obj = value.as_object().unwrap();
        assert_eq!(first_string(obj, MEMBER_NAME_ALIASES), Some("A"));
    }

    #[test]
    fn test_first_string_skips_empty() {
        let value = json!({
            "name": "",
            "full_name": "A",
        });
        let obj = value.as_object().unwrap();
        assert_eq!(first_string(obj, MEMBER_NAME_ALIASES), Some("A"));
    }

    #[test]
    fn test_first_string_skips_non_strings() {
        let value = json!({
            "name": 42,
            "full_name": "A",
        });
        let obj = value.as_object().unwrap();
        assert_eq!(first_string(obj, MEMBER_NAME_ALIASES), Some("A"));
    }

    #[test]
    fn test_first_id_coerces_numbers() {
        let value = json!({ "id": 7 });
        let obj = value.as_object().unwrap();
        assert_eq!(first_id(obj, MEMBER_ID_ALIASES), Some("7".to_string()));
    }

    #[test]
    fn test_first_id_member_id_beats_uuid() {
        let value = json!({
            "uuid": "u-1",
            "member_id": "m-1",
        });
        let obj = value.as_object().unwrap();
        assert_eq!(first_id(obj, MEMBER_ID_ALIASES), Some("m-1".to_string()));
    }

    #[test]
    fn test_first_id_id_beats_member_id() {
        let value = json!({
            "member_id": "m-1",
            "id": "i-1",
            "uuid": "u-1",
        });
        let obj = value.as_object().unwrap();
        assert_eq!(first_id(obj, MEMBER_ID_ALIASES), Some("i-1".to_string()));
    }

    #[test]
    fn test_extract_token_fields_snake_case() {
        let tokens = extract_token_fields(&json!({
            "access_token": "a",
            "refresh_token": "r",
        }))
        .unwrap();
        assert_eq!(tokens.access_token, "a");
        assert_eq!(tokens.refresh_token.as_deref(), Some("r"));
    }

    #[test]
    fn test_extract_token_fields_alias_priority() {
        // access_token wins over token even when both are present
        let tokens = extract_token_fields(&json!({
            "token": "fallback",
            "access_token": "primary",
        }))
        .unwrap();
        assert_eq!(tokens.access_token, "primary");
    }

    #[test]
    fn test_extract_token_fields_bare_token_alias() {
        let tokens = extract_token_fields(&json!({ "token": "t" })).unwrap();
        assert_eq!(tokens.access_token, "t");
        assert_eq!(tokens.refresh_token, None);
    }

    #[test]
    fn test_extract_token_fields_missing_access_token() {
        assert_eq!(extract_token_fields(&json!({ "refresh_token": "r" })), None);
        assert_eq!(extract_token_fields(&json!({ "access_token": "" })), None);
        assert_eq!(extract_token_fields(&json!("just a string")), None);
        assert_eq!(extract_token_fields(&json!(null)), None);
    }

    #[test]
    fn test_member_items_bare_array() {
        let value = json!([{ "id": 1 }, { "id": 2 }]);
        assert_eq!(member_items(&value).len(), 2);
    }

    #[test]
    fn test_member_items_wrapped_object() {
        let value = json!({ "items": [{ "id": 1 }] });
        assert_eq!(member_items(&value).len(), 1);
    }

    #[test]
    fn test_member_items_unrecognized_shape() {
        assert!(member_items(&json!({ "members": [] })).is_empty());
        assert!(member_items(&json!("nope")).is_empty());
        assert!(member_items(&json!(null)).is_empty());
    }
}
