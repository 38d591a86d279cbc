//! Integration test harness for TyphoonX.
//!
//! Spawns the real routers on ephemeral ports next to an in-process stub of
//! the hosted platform, then drives the flows with a cookie-enabled
//! `reqwest` client. The stub counts every hit per endpoint so tests can
//! assert not just what a page shows but which upstream calls were (or were
//! not) issued.
//!
//! ```rust,ignore
//! let platform = StubPlatform::spawn().await;
//! let console = TestConsole::spawn(&platform).await;
//!
//! let client = console.client();
//! let response = client
//!     .post(console.url("/login"))
//!     .form(&[("email", "admin@wapitee.io"), ("password", "hunter2x")])
//!     .send()
//!     .await?;
//! assert_eq!(platform.hits(Endpoint::Token), 1);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use secrecy::SecretString;
use serde_json::{Value, json};

use typhoonx_admin::config::{AdminConfig, FeatureFlags, PlatformConfig};
use typhoonx_admin::middleware::create_session_layer;
use typhoonx_admin::routes;
use typhoonx_admin::state::AppState;
use typhoonx_functions::config::{FunctionsConfig, SignupPolicy};
use typhoonx_functions::signup::{self, ServiceState};

// ─── Stub platform ──────────────────────────────────────────────────────

/// Stubbed platform endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `POST /auth/v1/token`
    Token,
    /// `POST /auth/v1/logout`
    Logout,
    /// `GET /functions/v1/get-merchant-list`
    MerchantList,
    /// `POST /functions/v1/manage-merchant`
    MerchantManage,
    /// `POST /functions/v1/user_signup` (the deployed signup function)
    SignupFunction,
    /// `POST /auth/v1/admin/users` (admin identity API)
    AdminUsers,
}

/// One stubbed endpoint: a configurable canned response plus a hit counter.
struct StubEndpoint {
    hits: AtomicUsize,
    response: Mutex<(u16, Value)>,
}

impl StubEndpoint {
    fn new(status: u16, body: Value) -> Self {
        Self {
            hits: AtomicUsize::new(0),
            response: Mutex::new((status, body)),
        }
    }

    fn respond(&self) -> Response {
        self.hits.fetch_add(1, Ordering::SeqCst);
        let (status, body) = self.response.lock().expect("stub lock").clone();
        let status = StatusCode::from_u16(status).expect("stub status");
        (status, Json(body)).into_response()
    }
}

/// Shared state of the stub platform.
pub struct StubState {
    token: StubEndpoint,
    logout: StubEndpoint,
    list: StubEndpoint,
    manage: StubEndpoint,
    signup_function: StubEndpoint,
    admin_users: StubEndpoint,
    /// Authorization header seen on the most recent list call.
    last_list_authorization: Mutex<Option<String>>,
    /// apikey header seen on the most recent list call.
    last_list_apikey: Mutex<Option<String>>,
}

/// An in-process stand-in for the hosted platform.
pub struct StubPlatform {
    /// Base URL of the stub (no trailing slash).
    pub base_url: String,
    state: Arc<StubState>,
}

impl StubPlatform {
    /// Spawn the stub with happy-path defaults: sign-in succeeds with a
    /// fixed token, the merchant list is empty, create succeeds.
    pub async fn spawn() -> Self {
        let state = Arc::new(StubState {
            token: StubEndpoint::new(200, json!({ "access_token": "stub-token" })),
            logout: StubEndpoint::new(204, json!({})),
            list: StubEndpoint::new(200, json!({ "success": true, "merchants": [] })),
            manage: StubEndpoint::new(200, json!({ "success": true })),
            signup_function: StubEndpoint::new(200, json!({ "ok": true, "userId": "u-stub" })),
            admin_users: StubEndpoint::new(200, json!({ "id": "u-stub" })),
            last_list_authorization: Mutex::new(None),
            last_list_apikey: Mutex::new(None),
        });

        let app = Router::new()
            .route("/auth/v1/token", post(stub_token))
            .route("/auth/v1/logout", post(stub_logout))
            .route("/functions/v1/get-merchant-list", get(stub_list))
            .route("/functions/v1/manage-merchant", post(stub_manage))
            .route("/functions/v1/user_signup", post(stub_signup_function))
            .route("/auth/v1/admin/users", post(stub_admin_users))
            .with_state(Arc::clone(&state));

        let base_url = spawn_router(app).await;

        Self { base_url, state }
    }

    /// Number of requests the stub has served on `endpoint`.
    #[must_use]
    pub fn hits(&self, endpoint: Endpoint) -> usize {
        self.endpoint(endpoint).hits.load(Ordering::SeqCst)
    }

    /// Replace the canned response for `endpoint`.
    pub fn set_response(&self, endpoint: Endpoint, status: u16, body: Value) {
        *self.endpoint(endpoint).response.lock().expect("stub lock") = (status, body);
    }

    /// Authorization header of the most recent merchant list call.
    #[must_use]
    pub fn last_list_authorization(&self) -> Option<String> {
        self.state
            .last_list_authorization
            .lock()
            .expect("stub lock")
            .clone()
    }

    /// apikey header of the most recent merchant list call.
    #[must_use]
    pub fn last_list_apikey(&self) -> Option<String> {
        self.state.last_list_apikey.lock().expect("stub lock").clone()
    }

    fn endpoint(&self, endpoint: Endpoint) -> &StubEndpoint {
        match endpoint {
            Endpoint::Token => &self.state.token,
            Endpoint::Logout => &self.state.logout,
            Endpoint::MerchantList => &self.state.list,
            Endpoint::MerchantManage => &self.state.manage,
            Endpoint::SignupFunction => &self.state.signup_function,
            Endpoint::AdminUsers => &self.state.admin_users,
        }
    }
}

async fn stub_token(State(state): State<Arc<StubState>>) -> Response {
    state.token.respond()
}

async fn stub_logout(State(state): State<Arc<StubState>>) -> Response {
    state.logout.respond()
}

async fn stub_list(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    *state.last_list_authorization.lock().expect("stub lock") = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    *state.last_list_apikey.lock().expect("stub lock") = headers
        .get("apikey")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    state.list.respond()
}

async fn stub_manage(State(state): State<Arc<StubState>>) -> Response {
    state.manage.respond()
}

async fn stub_signup_function(State(state): State<Arc<StubState>>) -> Response {
    state.signup_function.respond()
}

async fn stub_admin_users(State(state): State<Arc<StubState>>) -> Response {
    state.admin_users.respond()
}

// ─── Console under test ─────────────────────────────────────────────────

/// The admin console spawned against a stub platform.
pub struct TestConsole {
    /// Base URL of the console (no trailing slash).
    pub base_url: String,
}

impl TestConsole {
    /// Spawn the console with default feature flags.
    pub async fn spawn(platform: &StubPlatform) -> Self {
        Self::spawn_with_features(platform, FeatureFlags::default()).await
    }

    /// Spawn the console with explicit feature flags.
    pub async fn spawn_with_features(platform: &StubPlatform, features: FeatureFlags) -> Self {
        let config = admin_config(&platform.base_url, features);
        let state = AppState::new(config.clone()).expect("app state");
        let session_layer = create_session_layer(state.config());

        let app = Router::new()
            .merge(routes::routes(config.features))
            .layer(session_layer)
            .with_state(state);

        let base_url = spawn_router(app).await;

        Self { base_url }
    }

    /// A cookie-enabled client for driving the console.
    #[must_use]
    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("reqwest client")
    }

    /// Absolute URL for a console path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Console configuration pointing every endpoint at the stub.
fn admin_config(platform_url: &str, features: FeatureFlags) -> AdminConfig {
    AdminConfig {
        host: "127.0.0.1".parse().expect("host"),
        port: 0,
        base_url: "http://console.test".to_owned(),
        platform: PlatformConfig {
            base_url: platform_url.to_owned(),
            anon_key: "stub-anon-key".to_owned(),
            signup_function_url: format!("{platform_url}/functions/v1/user_signup"),
            merchant_list_url: format!("{platform_url}/functions/v1/get-merchant-list"),
            merchant_manage_url: format!("{platform_url}/functions/v1/manage-merchant"),
        },
        allowed_domain: "wapitee.io".to_owned(),
        features,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

// ─── Signup service under test ──────────────────────────────────────────

/// The signup service spawned against a stub platform.
pub struct TestSignupService {
    /// Base URL of the service (no trailing slash).
    pub base_url: String,
}

impl TestSignupService {
    /// Spawn the service with the default policy (min length 6, no
    /// auto-confirm).
    pub async fn spawn(platform: &StubPlatform) -> Self {
        Self::spawn_with_policy(
            platform,
            SignupPolicy {
                min_password_length: 6,
                email_autoconfirm: false,
            },
        )
        .await
    }

    /// Spawn the service with an explicit policy.
    pub async fn spawn_with_policy(platform: &StubPlatform, policy: SignupPolicy) -> Self {
        let config = FunctionsConfig {
            host: "127.0.0.1".parse().expect("host"),
            port: 0,
            platform_url: platform.base_url.clone(),
            service_role_key: SecretString::from("kX9#vQ2$mP7!wN4@zR8%tL1&yB5^stub"),
            allowed_origin: "*".to_owned(),
            policy,
        };

        let state = ServiceState::new(&config).expect("service state");
        let app = signup::router(&config, state);
        let base_url = spawn_router(app).await;

        Self { base_url }
    }

    /// Absolute URL for a service path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

// ─── Shared plumbing ────────────────────────────────────────────────────

/// Bind an ephemeral port, serve the router in the background, and return
/// the base URL.
async fn spawn_router(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    format!("http://{addr}")
}
