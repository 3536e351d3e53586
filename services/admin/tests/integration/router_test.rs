use std::sync::Arc;
use std::time::Duration;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderValue, StatusCode};
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use roofline_domain::account::{AccountRole, AdminRole};
use roofline_storage::s3::{S3Settings, S3Storage};
use roofline_testing::auth::MockAuth;
use roofline_testing::fixture::Fixture;

use roofline_admin::router::build_router;
use roofline_admin::state::{AppState, Settings};

use crate::helpers::TEST_ADMIN_JWT_SECRET;

/// Router over a disconnected database and an unused Redis pool: only requests
/// rejected before any query succeed.
fn server() -> TestServer {
    let redis = deadpool_redis::Config::from_url("redis://127.0.0.1:6379")
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .unwrap();
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        redis,
        jwt_secret: Arc::from(TEST_ADMIN_JWT_SECRET),
        storage: S3Storage::new(S3Settings {
            region: "ap-south-1".to_owned(),
            bucket: "roofline-test".to_owned(),
            access_key_id: "test".to_owned(),
            secret_access_key: "test".to_owned(),
            url_ttl: Duration::from_secs(60),
        }),
        settings: Settings {
            validity_days: 365,
            login_max_attempts: 5,
            login_window_secs: 900,
        },
    };
    TestServer::new(build_router(state)).unwrap()
}

fn bearer(role: AdminRole) -> HeaderValue {
    HeaderValue::from_str(&MockAuth::admin(role, TEST_ADMIN_JWT_SECRET).bearer()).unwrap()
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_answer_liveness_and_report_unready_database() {
    let server = server();
    assert_eq!(server.get("/healthz").await.status_code(), StatusCode::OK);
    assert_eq!(
        server.get("/readyz").await.status_code(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn should_return_404_with_request_id_for_unknown_route() {
    let response = server().get("/api/admin/nope").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key("x-request-id"));
}

// ── Admin tokens ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_admin_bearer_token() {
    let response = server().get("/api/admin/dashboard/stats").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["kind"], "UNAUTHORIZED");
}

#[tokio::test]
async fn should_reject_marketplace_token_signed_with_other_secret() {
    let token = MockAuth::account(AccountRole::Owner, "marketplace-secret").bearer();
    let response = server()
        .get("/api/admin/auth/me")
        .add_header(AUTHORIZATION, HeaderValue::from_str(&token).unwrap())
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_account_role_in_admin_token() {
    let token = MockAuth::account(AccountRole::User, TEST_ADMIN_JWT_SECRET).bearer();
    let response = server()
        .get("/api/admin/activity-logs")
        .add_header(AUTHORIZATION, HeaderValue::from_str(&token).unwrap())
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

// ── Request validation ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_email_and_password_on_login() {
    let response = server()
        .post("/api/admin/auth/login")
        .json(&json!({ "email": "ops@roofline.test", "password": "" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["kind"], "VALIDATION");
    assert_eq!(body["message"], "email and password are required");
}

#[tokio::test]
async fn should_reject_malformed_permission_bag() {
    let mut body = Fixture::load("contracts/http/admin/create_employee.json");
    body["permissions"]["canManageUsers"] = json!("yes");

    let response = server()
        .post("/api/admin/employees")
        .add_header(AUTHORIZATION, bearer(AdminRole::MainAdmin))
        .json(&body)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "VALIDATION");
}

#[tokio::test]
async fn should_reject_unknown_review_decision() {
    let mut body = Fixture::load("contracts/http/admin/review_verification.json");
    body["status"] = json!("UNDER_REVIEW");

    let response = server()
        .post(&format!(
            "/api/admin/verifications/{}/review",
            uuid::Uuid::new_v4()
        ))
        .add_header(AUTHORIZATION, bearer(AdminRole::Employee))
        .json(&body)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_reject_unparseable_status_filter() {
    let response = server()
        .get("/api/admin/verifications?status=LOST")
        .add_header(AUTHORIZATION, bearer(AdminRole::MainAdmin))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "VALIDATION");
}

#[tokio::test]
async fn should_reject_malformed_account_id() {
    let response = server()
        .get("/api/admin/accounts/not-a-uuid")
        .add_header(AUTHORIZATION, bearer(AdminRole::MainAdmin))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
