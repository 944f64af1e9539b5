//! Member directory and attendance calls over real HTTP, including the
//! normalization of loosely-shaped backend payloads.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use flock_core::Role;
use flock_integration_tests::{test_client, tokens};

use flock_client::ApiClient;

/// A client with valid stored credentials, so every call here carries the
/// same bearer token.
async fn signed_in_client(server: &MockServer) -> ApiClient {
    let (api, store) = test_client(&server.uri());
    store.put(&tokens("a1", Some("r1")));
    api
}

// ============================================================================
// Member Directory
// ============================================================================

#[tokio::test]
async fn test_list_members_normalizes_alias_fields() {
    let server = MockServer::start().await;
    let api = signed_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/members"))
        .and(header("authorization", "Bearer a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "id": 7, "full_name": "Avery Chen", "email": "avery@example.com", "role": "staff" },
                { "member_id": "m-2", "display_name": "", "email": "b@example.com" },
            ],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let members = api.list_members().await.unwrap();

    assert_eq!(members.len(), 2);

    let first = &members[0];
    assert_eq!(first.id, "7");
    assert_eq!(first.name, "Avery Chen");
    assert_eq!(first.role, Some(Role::Staff));

    // Empty display name falls through to the email.
    let second = &members[1];
    assert_eq!(second.id, "m-2");
    assert_eq!(second.name, "b@example.com");
    assert_eq!(second.role, None);
}

#[tokio::test]
async fn test_list_members_accepts_bare_array() {
    let server = MockServer::start().await;
    let api = signed_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/members"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }, { "id": 2 }])),
        )
        .mount(&server)
        .await;

    let members = api.list_members().await.unwrap();
    assert_eq!(members.len(), 2);
}

#[tokio::test]
async fn test_list_members_treats_unexpected_shape_as_empty() {
    let server = MockServer::start().await;
    let api = signed_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 0 })))
        .mount(&server)
        .await;

    let members = api.list_members().await.unwrap();
    assert!(members.is_empty());
}

#[tokio::test]
async fn test_get_member_by_id() {
    let server = MockServer::start().await;
    let api = signed_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/members/m-7"))
        .and(header("authorization", "Bearer a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uuid": "m-7",
            "name": "Sam",
            "role": "pastor",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let member = api.get_member("m-7").await.unwrap();
    assert_eq!(member.id, "m-7");
    assert_eq!(member.name, "Sam");
    assert_eq!(member.role, Some(Role::Pastor));
}

#[tokio::test]
async fn test_update_member_role_patches_role() {
    let server = MockServer::start().await;
    let api = signed_in_client(&server).await;

    Mock::given(method("PATCH"))
        .and(path("/members/7"))
        .and(body_json(json!({ "role": "staff" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "name": "Avery",
            "role": "staff",
        })))
        .expect(1)
        .mount(&server)
        .await;

    api.update_member_role("7", Role::Staff).await.unwrap();
}

#[tokio::test]
async fn test_update_member_role_failure_is_surfaced() {
    let server = MockServer::start().await;
    let api = signed_in_client(&server).await;

    Mock::given(method("PATCH"))
        .and(path("/members/7"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "detail": "Managers only",
        })))
        .mount(&server)
        .await;

    let err = api.update_member_role("7", Role::Member).await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(403));
    assert_eq!(err.to_string(), "Managers only");
}

// ============================================================================
// Attendance
// ============================================================================

#[tokio::test]
async fn test_check_in_for_self_sends_empty_body() {
    let server = MockServer::start().await;
    let api = signed_in_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/attendance/check-in"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    api.check_in(None).await.unwrap();
}

#[tokio::test]
async fn test_check_in_for_member_sends_member_id() {
    let server = MockServer::start().await;
    let api = signed_in_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/attendance/check-in"))
        .and(body_json(json!({ "member_id": "m-2" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    api.check_in(Some("m-2")).await.unwrap();
}

#[tokio::test]
async fn test_check_out() {
    let server = MockServer::start().await;
    let api = signed_in_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/attendance/check-out"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    api.check_out(None).await.unwrap();
}
