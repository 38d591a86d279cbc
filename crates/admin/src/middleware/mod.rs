//! Session plumbing and authentication extractors.

pub mod auth;
pub mod session;

pub use auth::RequireToken;
pub use session::{
    SESSION_COOKIE_NAME, access_token, clear_access_token, create_session_layer, set_access_token,
};
