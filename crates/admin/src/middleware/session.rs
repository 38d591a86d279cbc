//! Session layer and the access-token slot.
//!
//! The session holds exactly one piece of state: the platform access token,
//! under the fixed key `tpx_access_token`. No expiry metadata is stored
//! next to it; the platform's own token expiry is authoritative, and
//! absence is the only failure signal consumers see.
//!
//! All reads and writes go through the accessors below rather than ad-hoc
//! session lookups at call sites.

use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::config::AdminConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "tpx_session";

/// The single session slot holding the platform access token.
const ACCESS_TOKEN: &str = "tpx_access_token";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer.
///
/// Sessions are held in process memory; the console persists nothing but
/// the one token slot, so losing sessions on restart just means signing in
/// again.
#[must_use]
pub fn create_session_layer(config: &AdminConfig) -> SessionManagerLayer<MemoryStore> {
    let store = MemoryStore::default();

    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Store the access token in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_access_token(
    session: &Session,
    token: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(ACCESS_TOKEN, token).await
}

/// Read the access token from the session, if one is present.
pub async fn access_token(session: &Session) -> Option<String> {
    session
        .get::<String>(ACCESS_TOKEN)
        .await
        .ok()
        .flatten()
        .filter(|t| !t.is_empty())
}

/// Remove the access token from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_access_token(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<String>(ACCESS_TOKEN).await?;
    Ok(())
}
