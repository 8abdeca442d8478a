//! Integration tests for authentication and access-control routes.

use reqwest::StatusCode;
use serde_json::Value;

use venuedesk_core::OrganizationId;
use venuedesk_integration_tests::{TestServer, user};

#[tokio::test]
async fn test_health_is_public() {
    let server = TestServer::start().await;
    let resp = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let server = TestServer::start().await;
    let resp = server
        .client
        .get(server.url("/api/access"))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let server = TestServer::start().await;
    let resp = server
        .client
        .get(server.url("/api/access"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_current_access_for_manager() {
    let server = TestServer::start().await;
    let manager = user("manager", Some("growth"), OrganizationId::new_v4());

    let resp = server.get("/api/access", &manager).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["role_id"], "manager");
    assert_eq!(body["role"]["name"], "Manager");
    let permissions = body["permissions"].as_array().expect("permissions array");
    assert!(permissions.iter().any(|p| p == "bookings.view"));
    assert!(!permissions.iter().any(|p| p == "billing.manage"));
}

#[tokio::test]
async fn test_unknown_role_has_no_permissions() {
    let server = TestServer::start().await;
    let stranger = user("janitor", None, OrganizationId::new_v4());

    let body: Value = server
        .get("/api/access", &stranger)
        .await
        .json()
        .await
        .expect("Invalid JSON");
    assert!(body["role"].is_null());
    assert_eq!(body["permissions"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_list_roles() {
    let server = TestServer::start().await;
    let staff = user("staff", None, OrganizationId::new_v4());

    let body: Value = server
        .get("/api/access/roles", &staff)
        .await
        .json()
        .await
        .expect("Invalid JSON");
    let ids: Vec<&str> = body
        .as_array()
        .expect("roles array")
        .iter()
        .filter_map(|role| role["id"].as_str())
        .collect();
    assert_eq!(
        ids,
        ["system-admin", "super-admin", "admin", "manager", "staff"]
    );
}

#[tokio::test]
async fn test_check_all_and_any() {
    let server = TestServer::start().await;
    let staff = user("staff", None, OrganizationId::new_v4());

    let all: Value = server
        .get(
            "/api/access/check?permission=bookings.edit,bookings.delete",
            &staff,
        )
        .await
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(all["mode"], "all");
    assert_eq!(all["allowed"], false);

    let any: Value = server
        .get(
            "/api/access/check?permission=bookings.edit,bookings.delete&mode=any",
            &staff,
        )
        .await
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(any["mode"], "any");
    assert_eq!(any["allowed"], true);
}

#[tokio::test]
async fn test_check_rejects_malformed_permission() {
    let server = TestServer::start().await;
    let staff = user("staff", None, OrganizationId::new_v4());

    let resp = server
        .get("/api/access/check?permission=Bookings.View", &staff)
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_route_check() {
    let server = TestServer::start().await;
    let staff = user("staff", None, OrganizationId::new_v4());

    let reports: Value = server
        .get("/api/access/route?path=/reports/monthly", &staff)
        .await
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(reports["required_permission"], "reports.view");
    assert_eq!(reports["allowed"], false);

    let login: Value = server
        .get("/api/access/route?path=/login", &staff)
        .await
        .json()
        .await
        .expect("Invalid JSON");
    assert!(login["required_permission"].is_null());
    assert_eq!(login["allowed"], true);

    let resp = server.get("/api/access/route?path=reports", &staff).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
