//! The signup endpoint.
//!
//! Accepts `{email, password}`, applies the configured policy, and creates
//! the account through the platform admin identity API. Local rejections
//! never reach the platform.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use typhoonx_core::Email;

use crate::config::{FunctionsConfig, SignupPolicy};
use crate::identity::{IdentityAdminClient, IdentityError};

/// Shared state for the signup service.
#[derive(Clone)]
pub struct ServiceState {
    identity: IdentityAdminClient,
    policy: SignupPolicy,
}

impl ServiceState {
    /// Build the state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity client fails to build.
    pub fn new(config: &FunctionsConfig) -> Result<Self, IdentityError> {
        Ok(Self {
            identity: IdentityAdminClient::new(config)?,
            policy: config.policy,
        })
    }
}

/// Build the service router, CORS included.
pub fn router(config: &FunctionsConfig, state: ServiceState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_origin(allow_origin(&config.allowed_origin));

    Router::new()
        .route("/health", get(health))
        .route("/signup", post(signup))
        .layer(cors)
        .with_state(state)
}

/// Resolve the configured CORS origin.
fn allow_origin(origin: &str) -> AllowOrigin {
    if origin == "*" {
        AllowOrigin::from(Any)
    } else {
        HeaderValue::from_str(origin).map_or_else(|_| AllowOrigin::from(Any), AllowOrigin::from)
    }
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Signup request body. Both fields are checked explicitly so a missing
/// one gets the 400 envelope rather than an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Handle a signup request.
async fn signup(State(state): State<ServiceState>, Json(body): Json<SignupRequest>) -> Response {
    let (email, password) = match validate(&body, state.policy.min_password_length) {
        Ok(fields) => fields,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, &message),
    };

    match state
        .identity
        .create_user(email, password, state.policy.email_autoconfirm)
        .await
    {
        Ok(user) => (StatusCode::OK, Json(json!({ "ok": true, "userId": user.id }))).into_response(),
        Err(IdentityError::Api { status, message }) => {
            tracing::warn!(status, "Platform refused account creation: {message}");
            error_response(StatusCode::BAD_REQUEST, &message)
        }
        Err(e) => {
            tracing::error!("Account creation failed: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

/// Local policy checks; failures never reach the platform.
fn validate(
    body: &SignupRequest,
    min_password_length: usize,
) -> Result<(&str, &str), String> {
    let email = body.email.as_deref().filter(|s| !s.is_empty());
    let password = body.password.as_deref().filter(|s| !s.is_empty());

    let (Some(email), Some(password)) = (email, password) else {
        return Err("Missing email or password".to_owned());
    };

    if !Email::is_valid(email) {
        return Err("Invalid email format".to_owned());
    }

    if password.chars().count() < min_password_length {
        return Err(format!(
            "Password must be at least {min_password_length} characters"
        ));
    }

    Ok((email, password))
}

/// The 4xx/5xx envelope: `{"error": <message>}`.
fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
