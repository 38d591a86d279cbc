//! Authentication route handlers.
//!
//! Handles login, signup, the magic-link landing page, and logout. All
//! validation here is a UX nicety; the platform performs the authoritative
//! checks.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use typhoonx_core::{Email, is_allowed_domain};

use crate::error::AppError;
use crate::middleware::{access_token, clear_access_token, set_access_token};
use crate::state::AppState;

/// Minimum password length offered to the user before submitting.
///
/// The signup function's configured policy is authoritative; this check
/// only saves a round trip for obviously short input.
const MIN_PASSWORD_LENGTH: usize = 6;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Signup form data.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub confirm: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
    pub allowed_domain: String,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
    pub allowed_domain: String,
}

/// Magic-link landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/callback.html")]
pub struct CallbackTemplate;

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        error: query.error,
        success: query.success,
        allowed_domain: state.config().allowed_domain.clone(),
    }
}

/// Handle login form submission.
///
/// Validation failures short-circuit before any network call; gateway
/// errors come back as inline messages, verbatim. Only a session-layer
/// failure escapes as an `AppError`.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let email = form.email.trim();
    let allowed_domain = &state.config().allowed_domain;

    if !Email::is_valid(email) {
        return Ok(login_redirect("Please enter a valid email address."));
    }
    if !is_allowed_domain(email, allowed_domain) {
        return Ok(login_redirect(&format!(
            "Only @{allowed_domain} accounts can sign in."
        )));
    }
    if form.password.is_empty() {
        return Ok(login_redirect("Please enter your password."));
    }

    match state.auth().sign_in(email, &form.password).await {
        Ok(signed_in) => {
            set_access_token(&session, &signed_in.access_token).await?;

            Ok(Redirect::to("/admin/merchant").into_response())
        }
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            Ok(login_redirect(&e.to_string()))
        }
    }
}

/// Redirect back to the login page with an inline error message.
fn login_redirect(message: &str) -> Response {
    Redirect::to(&format!("/login?error={}", urlencoding::encode(message))).into_response()
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page.
pub async fn signup_page(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    SignupTemplate {
        error: query.error,
        success: query.success,
        allowed_domain: state.config().allowed_domain.clone(),
    }
}

/// Handle signup form submission.
///
/// Posts to the signup function; the function owns the real password and
/// confirmation policy.
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Response {
    let email = form.email.trim();
    let allowed_domain = &state.config().allowed_domain;

    if !Email::is_valid(email) {
        return signup_error_redirect("Please enter a valid email address.");
    }
    if !is_allowed_domain(email, allowed_domain) {
        return signup_error_redirect(&format!(
            "Only @{allowed_domain} accounts can be created."
        ));
    }
    if form.password.chars().count() < MIN_PASSWORD_LENGTH {
        return signup_error_redirect(&format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters."
        ));
    }
    if form.password != form.confirm {
        return signup_error_redirect("Passwords do not match.");
    }

    match state.auth().sign_up(email, &form.password).await {
        Ok(accepted) => {
            tracing::info!(user_id = ?accepted.user_id, "Account created");
            Redirect::to(&format!(
                "/auth/signup?success={}",
                urlencoding::encode(
                    "Account created. Check your inbox to verify your email (if verification is enabled)."
                )
            ))
            .into_response()
        }
        Err(e) => {
            tracing::warn!("Signup failed: {e}");
            signup_error_redirect(&e.to_string())
        }
    }
}

/// Redirect back to the signup page with an inline error message.
fn signup_error_redirect(message: &str) -> Response {
    Redirect::to(&format!(
        "/auth/signup?error={}",
        urlencoding::encode(message)
    ))
    .into_response()
}

// =============================================================================
// Magic-Link Landing Route
// =============================================================================

/// Display the magic-link landing page.
///
/// Shown after the platform redirects a completed magic-link sign-in; the
/// browser extension picks the flow up from here.
pub async fn callback_page() -> impl IntoResponse {
    CallbackTemplate
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Revokes the platform session best-effort, then clears the local session
/// on every exit path: whatever the identity service says, this request
/// ends logged out and back at the login page.
pub async fn logout(State(state): State<AppState>, session: Session) -> Redirect {
    if let Some(token) = access_token(&session).await {
        if let Err(e) = state.auth().sign_out(&token).await {
            tracing::warn!("Remote sign-out failed: {e}");
        }
    }

    if let Err(e) = clear_access_token(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }

    // Also destroy the entire session
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    Redirect::to("/login")
}
