use axum::http::StatusCode;
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::json;

use ancora_auth::router::build_router;
use ancora_auth::state::AppState;

use crate::helpers::TEST_JWT_SECRET;

/// State with no live database. Only routes that reject before touching
/// a repository can be exercised against it.
fn test_state() -> AppState {
    AppState {
        db: DatabaseConnection::Disconnected,
        http: reqwest::Client::new(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        admin_email: String::new(),
        admin_phone: String::new(),
        admin_password: String::new(),
        code_ttl_minutes: 15,
        identity_provider_url: "http://localhost:0".to_owned(),
        identity_provider_key: String::new(),
        delivery_provider_url: "http://localhost:0".to_owned(),
        delivery_provider_key: String::new(),
    }
}

fn server() -> TestServer {
    TestServer::new(build_router(test_state())).unwrap()
}

#[tokio::test]
async fn should_answer_health_probes() {
    let server = server();

    let response = server.get("/healthz").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server.get("/readyz").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<serde_json::Value>()["status"], "ready");
}

#[tokio::test]
async fn should_reject_session_check_without_bearer_header() {
    let server = server();
    let response = server.get("/auth/session").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_admin_routes_with_garbage_token() {
    let server = server();
    let response = server
        .post("/auth/invites")
        .authorization_bearer("not-a-jwt")
        .json(&json!({}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<serde_json::Value>()["kind"],
        "INVALID_TOKEN"
    );
}

#[tokio::test]
async fn should_report_malformed_identifier_as_validation_error() {
    let server = server();
    let response = server
        .post("/auth/login")
        .json(&json!({ "identifier": "not an identifier" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<serde_json::Value>()["kind"], "VALIDATION");
}
