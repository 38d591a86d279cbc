//! End-to-end tests for the signup service against the stub platform's
//! admin identity API.

use serde_json::{Value, json};
use uuid::Uuid;

use typhoonx_functions::config::SignupPolicy;
use typhoonx_integration_tests::{Endpoint, StubPlatform, TestSignupService};

async fn post_signup(service: &TestSignupService, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(service.url("/signup"))
        .json(&body)
        .send()
        .await
        .expect("signup request")
}

#[tokio::test]
async fn test_missing_fields_are_rejected_locally() {
    let platform = StubPlatform::spawn().await;
    let service = TestSignupService::spawn(&platform).await;

    let response = post_signup(&service, json!({ "email": "a@wapitee.io" })).await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["error"], "Missing email or password");

    let response = post_signup(&service, json!({ "password": "hunter2x" })).await;
    assert_eq!(response.status(), 400);

    // Nothing reached the platform
    assert_eq!(platform.hits(Endpoint::AdminUsers), 0);
}

#[tokio::test]
async fn test_invalid_email_is_rejected_locally() {
    let platform = StubPlatform::spawn().await;
    let service = TestSignupService::spawn(&platform).await;

    let response = post_signup(
        &service,
        json!({ "email": "not-an-email", "password": "hunter2x" }),
    )
    .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["error"], "Invalid email format");
    assert_eq!(platform.hits(Endpoint::AdminUsers), 0);
}

#[tokio::test]
async fn test_password_policy_is_deploy_time_configuration() {
    let platform = StubPlatform::spawn().await;

    // The default policy accepts 6 characters
    let service = TestSignupService::spawn(&platform).await;
    let response = post_signup(
        &service,
        json!({ "email": "a@wapitee.io", "password": "123456" }),
    )
    .await;
    assert_eq!(response.status(), 200);

    // A stricter deployment rejects the same password
    let strict = TestSignupService::spawn_with_policy(
        &platform,
        SignupPolicy {
            min_password_length: 9,
            email_autoconfirm: false,
        },
    )
    .await;
    let response = post_signup(
        &strict,
        json!({ "email": "a@wapitee.io", "password": "123456" }),
    )
    .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["error"], "Password must be at least 9 characters");
}

#[tokio::test]
async fn test_successful_signup_returns_the_platform_user_id() {
    let platform = StubPlatform::spawn().await;
    platform.set_response(Endpoint::AdminUsers, 200, json!({ "id": "u-123" }));
    let service = TestSignupService::spawn(&platform).await;

    let email = format!("{}@wapitee.io", Uuid::new_v4());
    let response = post_signup(&service, json!({ "email": email, "password": "hunter2x" })).await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["ok"], true);
    assert_eq!(body["userId"], "u-123");
    assert_eq!(platform.hits(Endpoint::AdminUsers), 1);
}

#[tokio::test]
async fn test_platform_rejection_is_surfaced_as_a_400() {
    let platform = StubPlatform::spawn().await;
    platform.set_response(
        Endpoint::AdminUsers,
        422,
        json!({ "msg": "User already registered" }),
    );
    let service = TestSignupService::spawn(&platform).await;

    let response = post_signup(
        &service,
        json!({ "email": "a@wapitee.io", "password": "hunter2x" }),
    )
    .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["error"], "User already registered");
}
