//! End-to-end tests for the admin console flow: sign-in, the gated
//! merchant table, create, and logout, all against the stub platform.

use serde_json::json;

use typhoonx_admin::config::FeatureFlags;
use typhoonx_integration_tests::{Endpoint, StubPlatform, TestConsole};

/// One Acme merchant, as the list function returns it.
fn acme_list_body() -> serde_json::Value {
    json!({
        "success": true,
        "user_email": "admin@wapitee.io",
        "user_id": "u-1",
        "merchant_count": 1,
        "merchants": [{
            "merchant_id": "m1",
            "merchant_name": "Acme",
            "status": "active",
            "created_at": "2024-01-01T00:00:00Z"
        }],
        "timestamp": "2024-01-02T00:00:00Z"
    })
}

/// Sign the client in through the real login form.
async fn login(client: &reqwest::Client, console: &TestConsole) -> reqwest::Response {
    client
        .post(console.url("/login"))
        .form(&[("email", "admin@wapitee.io"), ("password", "hunter2x")])
        .send()
        .await
        .expect("login request")
}

// ============================================================================
// Sign-in
// ============================================================================

#[tokio::test]
async fn test_login_success_stores_token_and_renders_merchants() {
    let platform = StubPlatform::spawn().await;
    platform.set_response(Endpoint::MerchantList, 200, acme_list_body());
    let console = TestConsole::spawn(&platform).await;
    let client = console.client();

    let response = login(&client, &console).await;

    // Redirected into the gated page, which fetched and rendered the list
    assert_eq!(response.url().path(), "/admin/merchant");
    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("body");
    assert!(body.contains("Acme"));
    assert!(body.contains(">active<"));
    // Exactly one row (the attribute form only appears on row buttons)
    assert_eq!(body.matches("data-copy-id=\"").count(), 1);

    // The authorized fetch carried the issued token and the static API key
    assert_eq!(platform.hits(Endpoint::Token), 1);
    assert_eq!(platform.hits(Endpoint::MerchantList), 1);
    assert_eq!(
        platform.last_list_authorization().as_deref(),
        Some("Bearer stub-token")
    );
    assert_eq!(platform.last_list_apikey().as_deref(), Some("stub-anon-key"));
}

#[tokio::test]
async fn test_login_success_without_token_is_an_error() {
    let platform = StubPlatform::spawn().await;
    // 2xx, but no access_token field
    platform.set_response(Endpoint::Token, 200, json!({ "token_type": "bearer" }));
    let console = TestConsole::spawn(&platform).await;
    let client = console.client();

    let response = login(&client, &console).await;

    assert_eq!(response.url().path(), "/login");
    let body = response.text().await.expect("body");
    assert!(body.contains("Login failed, please retry."));

    // No token was stored: the gated page bounces without an upstream call
    let response = client
        .get(console.url("/admin/merchant"))
        .send()
        .await
        .expect("merchant page");
    assert_eq!(response.url().path(), "/login");
    assert_eq!(platform.hits(Endpoint::MerchantList), 0);
}

#[tokio::test]
async fn test_login_rejection_message_is_surfaced_verbatim() {
    let platform = StubPlatform::spawn().await;
    platform.set_response(
        Endpoint::Token,
        400,
        json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" }),
    );
    let console = TestConsole::spawn(&platform).await;
    let client = console.client();

    let response = login(&client, &console).await;

    assert_eq!(response.url().path(), "/login");
    let body = response.text().await.expect("body");
    assert!(body.contains("Invalid login credentials"));
}

#[tokio::test]
async fn test_login_validation_short_circuits_before_any_network_call() {
    let platform = StubPlatform::spawn().await;
    let console = TestConsole::spawn(&platform).await;
    let client = console.client();

    // Malformed email
    let response = client
        .post(console.url("/login"))
        .form(&[("email", "not-an-email"), ("password", "hunter2x")])
        .send()
        .await
        .expect("login request");
    let body = response.text().await.expect("body");
    assert!(body.contains("Please enter a valid email address."));

    // Wrong domain
    let response = client
        .post(console.url("/login"))
        .form(&[("email", "admin@gmail.com"), ("password", "hunter2x")])
        .send()
        .await
        .expect("login request");
    let body = response.text().await.expect("body");
    assert!(body.contains("Only @wapitee.io accounts can sign in."));

    // Empty password
    let response = client
        .post(console.url("/login"))
        .form(&[("email", "admin@wapitee.io"), ("password", "")])
        .send()
        .await
        .expect("login request");
    let body = response.text().await.expect("body");
    assert!(body.contains("Please enter your password."));

    assert_eq!(platform.hits(Endpoint::Token), 0);
}

// ============================================================================
// Gated merchant page
// ============================================================================

#[tokio::test]
async fn test_unauthenticated_merchant_page_redirects_without_upstream_call() {
    let platform = StubPlatform::spawn().await;
    let console = TestConsole::spawn(&platform).await;
    let client = console.client();

    let response = client
        .get(console.url("/admin/merchant"))
        .send()
        .await
        .expect("merchant page");

    assert_eq!(response.url().path(), "/login");
    assert_eq!(platform.hits(Endpoint::MerchantList), 0);
}

#[tokio::test]
async fn test_success_false_envelope_is_an_error_state_not_an_empty_table() {
    let platform = StubPlatform::spawn().await;
    platform.set_response(
        Endpoint::MerchantList,
        200,
        json!({ "success": false, "merchants": [] }),
    );
    let console = TestConsole::spawn(&platform).await;
    let client = console.client();

    let response = login(&client, &console).await;
    let body = response.text().await.expect("body");

    assert!(body.contains("The merchant service reported a failure."));
    assert!(!body.contains("No merchants yet"));
}

#[tokio::test]
async fn test_non_2xx_list_surfaces_the_body_text() {
    let platform = StubPlatform::spawn().await;
    platform.set_response(Endpoint::MerchantList, 500, json!("upstream exploded"));
    let console = TestConsole::spawn(&platform).await;
    let client = console.client();

    let response = login(&client, &console).await;
    let body = response.text().await.expect("body");

    assert!(body.contains("upstream exploded"));
}

#[tokio::test]
async fn test_empty_list_renders_the_empty_state() {
    let platform = StubPlatform::spawn().await;
    let console = TestConsole::spawn(&platform).await;
    let client = console.client();

    let response = login(&client, &console).await;
    let body = response.text().await.expect("body");

    assert!(body.contains("No merchants yet"));
}

// ============================================================================
// Create dialog
// ============================================================================

#[tokio::test]
async fn test_create_with_empty_domain_never_calls_the_manage_endpoint() {
    let platform = StubPlatform::spawn().await;
    let console = TestConsole::spawn(&platform).await;
    let client = console.client();
    login(&client, &console).await;

    let response = client
        .post(console.url("/admin/merchant/create"))
        .form(&[("merchant_name", "Acme"), ("domain", ""), ("status", "active")])
        .send()
        .await
        .expect("create request");

    let body = response.text().await.expect("body");
    assert!(body.contains("Domain is required."));
    // Dialog stays open with the inline message
    assert!(body.contains(r#"class="dialog-backdrop" id="create-dialog""#));
    assert_eq!(platform.hits(Endpoint::MerchantManage), 0);
}

#[tokio::test]
async fn test_create_with_empty_name_never_calls_the_manage_endpoint() {
    let platform = StubPlatform::spawn().await;
    let console = TestConsole::spawn(&platform).await;
    let client = console.client();
    login(&client, &console).await;

    let response = client
        .post(console.url("/admin/merchant/create"))
        .form(&[("merchant_name", "  "), ("domain", "acme.example"), ("status", "active")])
        .send()
        .await
        .expect("create request");

    let body = response.text().await.expect("body");
    assert!(body.contains("Merchant name is required."));
    assert_eq!(platform.hits(Endpoint::MerchantManage), 0);
}

#[tokio::test]
async fn test_create_success_redirects_and_refetches_the_list() {
    let platform = StubPlatform::spawn().await;
    let console = TestConsole::spawn(&platform).await;
    let client = console.client();
    login(&client, &console).await;
    let list_hits_after_login = platform.hits(Endpoint::MerchantList);

    let response = client
        .post(console.url("/admin/merchant/create"))
        .form(&[
            ("merchant_name", "Acme"),
            ("domain", "acme.example"),
            ("status", "active"),
        ])
        .send()
        .await
        .expect("create request");

    assert_eq!(response.url().path(), "/admin/merchant");
    assert_eq!(platform.hits(Endpoint::MerchantManage), 1);
    // Full-reload policy: the redirect re-fetched the list
    assert_eq!(
        platform.hits(Endpoint::MerchantList),
        list_hits_after_login + 1
    );
}

#[tokio::test]
async fn test_create_rejection_keeps_the_dialog_open_with_the_message() {
    let platform = StubPlatform::spawn().await;
    platform.set_response(
        Endpoint::MerchantManage,
        200,
        json!({ "success": false, "message": "merchant exists" }),
    );
    let console = TestConsole::spawn(&platform).await;
    let client = console.client();
    login(&client, &console).await;

    let response = client
        .post(console.url("/admin/merchant/create"))
        .form(&[
            ("merchant_name", "Acme"),
            ("domain", "acme.example"),
            ("status", "active"),
        ])
        .send()
        .await
        .expect("create request");

    let body = response.text().await.expect("body");
    assert!(body.contains("merchant exists"));
    assert!(body.contains(r#"class="dialog-backdrop" id="create-dialog""#));
    // The user's input survives the round trip
    assert!(body.contains(r#"value="Acme""#));
    assert!(body.contains(r#"value="acme.example""#));
}

// ============================================================================
// Feature flags
// ============================================================================

#[tokio::test]
async fn test_create_feature_off_removes_the_dialog_and_the_route() {
    let platform = StubPlatform::spawn().await;
    let console = TestConsole::spawn_with_features(
        &platform,
        FeatureFlags {
            merchant_create: false,
            merchant_domain: true,
        },
    )
    .await;
    let client = console.client();

    let response = login(&client, &console).await;
    let body = response.text().await.expect("body");
    assert!(!body.contains("New merchant"));
    assert!(!body.contains("create-dialog"));

    let response = client
        .post(console.url("/admin/merchant/create"))
        .form(&[("merchant_name", "Acme"), ("domain", "a.b"), ("status", "active")])
        .send()
        .await
        .expect("create request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_domain_feature_off_drops_the_column_and_the_required_check() {
    let platform = StubPlatform::spawn().await;
    platform.set_response(Endpoint::MerchantList, 200, acme_list_body());
    let console = TestConsole::spawn_with_features(
        &platform,
        FeatureFlags {
            merchant_create: true,
            merchant_domain: false,
        },
    )
    .await;
    let client = console.client();

    let response = login(&client, &console).await;
    let body = response.text().await.expect("body");
    assert!(!body.contains("<th>Domain</th>"));

    // Without the field there is no required check; the create goes out
    let response = client
        .post(console.url("/admin/merchant/create"))
        .form(&[("merchant_name", "Acme"), ("status", "active")])
        .send()
        .await
        .expect("create request");
    assert_eq!(response.url().path(), "/admin/merchant");
    assert_eq!(platform.hits(Endpoint::MerchantManage), 1);
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn test_logout_clears_the_session_even_when_the_remote_call_fails() {
    let platform = StubPlatform::spawn().await;
    platform.set_response(Endpoint::Logout, 500, json!({ "error": "boom" }));
    let console = TestConsole::spawn(&platform).await;
    let client = console.client();
    login(&client, &console).await;

    let response = client
        .post(console.url("/logout"))
        .send()
        .await
        .expect("logout request");

    assert_eq!(response.url().path(), "/login");
    assert_eq!(platform.hits(Endpoint::Logout), 1);

    // The token is gone: the gated page bounces without an upstream call
    let list_hits = platform.hits(Endpoint::MerchantList);
    let response = client
        .get(console.url("/admin/merchant"))
        .send()
        .await
        .expect("merchant page");
    assert_eq!(response.url().path(), "/login");
    assert_eq!(platform.hits(Endpoint::MerchantList), list_hits);
}

// ============================================================================
// Signup page
// ============================================================================

#[tokio::test]
async fn test_signup_validation_short_circuits_before_any_network_call() {
    let platform = StubPlatform::spawn().await;
    let console = TestConsole::spawn(&platform).await;
    let client = console.client();

    // Too short
    let response = client
        .post(console.url("/auth/signup"))
        .form(&[
            ("email", "new@wapitee.io"),
            ("password", "short"),
            ("confirm", "short"),
        ])
        .send()
        .await
        .expect("signup request");
    let body = response.text().await.expect("body");
    assert!(body.contains("Password must be at least 6 characters."));

    // Mismatch
    let response = client
        .post(console.url("/auth/signup"))
        .form(&[
            ("email", "new@wapitee.io"),
            ("password", "hunter2x"),
            ("confirm", "hunter2y"),
        ])
        .send()
        .await
        .expect("signup request");
    let body = response.text().await.expect("body");
    assert!(body.contains("Passwords do not match."));

    assert_eq!(platform.hits(Endpoint::SignupFunction), 0);
}

#[tokio::test]
async fn test_signup_success_shows_the_confirmation_hint() {
    let platform = StubPlatform::spawn().await;
    let console = TestConsole::spawn(&platform).await;
    let client = console.client();

    let response = client
        .post(console.url("/auth/signup"))
        .form(&[
            ("email", "new@wapitee.io"),
            ("password", "hunter2x"),
            ("confirm", "hunter2x"),
        ])
        .send()
        .await
        .expect("signup request");

    assert_eq!(response.url().path(), "/auth/signup");
    let body = response.text().await.expect("body");
    assert!(body.contains("Account created."));
    assert_eq!(platform.hits(Endpoint::SignupFunction), 1);
}

#[tokio::test]
async fn test_signup_rejection_message_is_surfaced_verbatim() {
    let platform = StubPlatform::spawn().await;
    platform.set_response(
        Endpoint::SignupFunction,
        400,
        json!({ "error": "User already registered" }),
    );
    let console = TestConsole::spawn(&platform).await;
    let client = console.client();

    let response = client
        .post(console.url("/auth/signup"))
        .form(&[
            ("email", "new@wapitee.io"),
            ("password", "hunter2x"),
            ("confirm", "hunter2x"),
        ])
        .send()
        .await
        .expect("signup request");

    let body = response.text().await.expect("body");
    assert!(body.contains("User already registered"));
}
