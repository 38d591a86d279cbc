//! Auth gateway error types.

use thiserror::Error;

/// Errors that can occur when talking to the platform identity service.
///
/// Every variant renders as an inline message on the form that triggered
/// the call; none of these abort the page.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The request never completed (connect, timeout, TLS).
    #[error("Network error, please try again later.")]
    Http(#[from] reqwest::Error),

    /// The identity service rejected the sign-in.
    #[error("{message}")]
    Rejected {
        /// HTTP status returned by the identity service.
        status: u16,
        /// The service's own error description, or a status fallback.
        message: String,
    },

    /// The identity service reported success but returned no access token.
    /// Treated as a failed login; the console never stores an empty token.
    #[error("Login failed, please retry.")]
    MissingToken,

    /// The signup function rejected the request.
    #[error("{0}")]
    SignupRejected(String),

    /// A response body could not be decoded.
    #[error("Unexpected response from the identity service.")]
    Parse(String),
}
