//! Authentication extractor.
//!
//! Gated pages require a stored access token. A missing token is not an
//! error the user sees; it is the unauthenticated state, resolved by
//! redirecting to the login page before the handler body runs.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::middleware::session::access_token;

/// Extractor that requires a platform access token in the session.
///
/// If no token is stored, the request is redirected to the login page and
/// the handler never runs - in particular, no upstream call is issued.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireToken(token): RequireToken,
/// ) -> impl IntoResponse {
///     // token is the bearer credential for directory calls
/// }
/// ```
pub struct RequireToken(pub String);

impl<S> FromRequestParts<S> for RequireToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Internal("session layer not installed".to_string()))?;

        let token = access_token(session)
            .await
            .ok_or(AppError::Unauthenticated)?;

        Ok(Self(token))
    }
}
