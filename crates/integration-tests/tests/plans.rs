//! Integration tests for plan gating routes.

use reqwest::StatusCode;
use serde_json::{Value, json};

use venuedesk_core::OrganizationId;
use venuedesk_integration_tests::{TestServer, user};

#[tokio::test]
async fn test_list_plans() {
    let server = TestServer::start().await;
    let admin = user("admin", Some("basic"), OrganizationId::new_v4());

    let body: Value = server
        .get("/api/plans", &admin)
        .await
        .json()
        .await
        .expect("Invalid JSON");
    let tiers: Vec<&str> = body
        .as_array()
        .expect("plans array")
        .iter()
        .filter_map(|plan| plan["tier"].as_str())
        .collect();
    assert_eq!(tiers, ["basic", "growth", "pro"]);
}

#[tokio::test]
async fn test_unknown_plan_falls_back_to_basic() {
    let server = TestServer::start().await;
    let admin = user("admin", Some("enterprise"), OrganizationId::new_v4());

    let body: Value = server
        .get("/api/plan", &admin)
        .await
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(body["plan_id"], "enterprise");
    assert_eq!(body["plan"]["tier"], "basic");
    assert_eq!(body["bypass"], false);
}

#[tokio::test]
async fn test_system_admin_bypasses_limits() {
    let server = TestServer::start().await;
    let operator = user("system-admin", Some("basic"), OrganizationId::new_v4());

    let plan: Value = server
        .get("/api/plan", &operator)
        .await
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(plan["bypass"], true);

    let decision: Value = server
        .post(
            "/api/plan/can-create",
            &operator,
            &json!({ "resource": "venues", "usage": 50 }),
        )
        .await
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(decision["allowed"], true);
    assert!(decision["limit"].is_null());

    let feature: Value = server
        .get("/api/plan/features/api_access", &operator)
        .await
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(feature["enabled"], true);
}

#[tokio::test]
async fn test_can_create_respects_limit() {
    let server = TestServer::start().await;
    let admin = user("admin", Some("growth"), OrganizationId::new_v4());

    let under: Value = server
        .post(
            "/api/plan/can-create",
            &admin,
            &json!({ "resource": "venues", "usage": 2 }),
        )
        .await
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(under["allowed"], true);
    assert_eq!(under["limit"], 3);
    assert_eq!(under["remaining"], 1);

    let at: Value = server
        .post(
            "/api/plan/can-create",
            &admin,
            &json!({ "resource": "venues", "usage": 3 }),
        )
        .await
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(at["allowed"], false);
    assert_eq!(at["remaining"], 0);
}

#[tokio::test]
async fn test_can_create_unknown_resource() {
    let server = TestServer::start().await;
    let admin = user("admin", Some("growth"), OrganizationId::new_v4());

    let resp = server
        .post(
            "/api/plan/can-create",
            &admin,
            &json!({ "resource": "rooms", "usage": 0 }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_feature_lookup() {
    let server = TestServer::start().await;
    let admin = user("admin", Some("basic"), OrganizationId::new_v4());

    let qr: Value = server
        .get("/api/plan/features/qr_codes", &admin)
        .await
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(qr["value"], false);
    assert_eq!(qr["enabled"], false);
    assert_eq!(qr["minimum_plan"], "growth");

    let analytics: Value = server
        .get("/api/plan/features/analytics", &admin)
        .await
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(analytics["value"], "basic");

    let resp = server.get("/api/plan/features/teleport", &admin).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Invalid JSON");
    let error = body["error"].as_str().expect("error message");
    assert!(error.contains("'teleport'"));
    assert!(error.contains("qr_codes"));
}

#[tokio::test]
async fn test_feature_enabled_for_system_admin() {
    let server = TestServer::start().await;
    let root = user("system-admin", Some("basic"), OrganizationId::new_v4());

    let qr: Value = server
        .get("/api/plan/features/qr_codes", &root)
        .await
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(qr["value"], true);
    assert_eq!(qr["enabled"], true);
}

#[tokio::test]
async fn test_usage_near_limit() {
    let server = TestServer::start().await;
    let admin = user("admin", Some("basic"), OrganizationId::new_v4());

    let status: Value = server
        .get("/api/plan/usage/bookings_per_month?usage=170", &admin)
        .await
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(status["limit"], 200);
    assert_eq!(status["percent_used"], 85);
    assert_eq!(status["near_limit"], true);
    assert_eq!(status["at_limit"], false);
}
