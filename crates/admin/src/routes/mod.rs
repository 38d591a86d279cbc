//! HTTP route handlers for the console.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Landing page
//! GET  /health                 - Health check (wired in main)
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Login action
//! GET  /auth/signup            - Signup page
//! POST /auth/signup            - Signup action
//! GET  /auth/callback          - Magic-link landing page (browser extension)
//! POST /logout                 - Logout action
//!
//! # Merchants (requires a session token)
//! GET  /admin/merchant         - Merchant table
//! POST /admin/merchant/create  - Create merchant (feature-gated)
//! ```

pub mod auth;
pub mod home;
pub mod merchant;

use axum::{
    Router,
    routing::{get, post},
};

use crate::config::FeatureFlags;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/auth/signup", get(auth::signup_page).post(auth::signup))
        .route("/auth/callback", get(auth::callback_page))
        .route("/logout", post(auth::logout))
}

/// Create the merchant routes router.
///
/// The create route only exists when the create feature is on; the page
/// variants of earlier deployments are a single implementation behind
/// these flags.
pub fn merchant_routes(features: FeatureFlags) -> Router<AppState> {
    let router = Router::new().route("/admin/merchant", get(merchant::index));

    if features.merchant_create {
        router.route("/admin/merchant/create", post(merchant::create))
    } else {
        router
    }
}

/// Create all routes for the console.
pub fn routes(features: FeatureFlags) -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .merge(auth_routes())
        .merge(merchant_routes(features))
}
