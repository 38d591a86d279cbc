//! Auth gateway client.
//!
//! Wraps the platform identity service's password grant and logout
//! endpoints, plus the signup function. The console never inspects tokens;
//! it stores whatever the identity service issues and presents it back on
//! directory calls.

mod error;

pub use error::AuthError;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;

use crate::config::PlatformConfig;

/// A successful sign-in.
#[derive(Debug, Clone)]
pub struct SignedIn {
    /// The bearer token for subsequent directory calls.
    pub access_token: String,
}

/// Outcome of a signup-function call.
#[derive(Debug, Clone)]
pub struct SignupAccepted {
    /// The new account's platform user id, when the function reports one.
    pub user_id: Option<String>,
}

/// Client for the platform identity service and the signup function.
#[derive(Clone)]
pub struct AuthGatewayClient {
    client: reqwest::Client,
    token_url: String,
    logout_url: String,
    signup_url: String,
}

impl AuthGatewayClient {
    /// Create a new auth gateway client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &PlatformConfig) -> Result<Self, AuthError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(&config.anon_key)
                .map_err(|e| AuthError::Parse(format!("invalid API key format: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let base = config.base_url.trim_end_matches('/');

        Ok(Self {
            client,
            token_url: format!("{base}/auth/v1/token?grant_type=password"),
            logout_url: format!("{base}/auth/v1/logout"),
            signup_url: config.signup_function_url.clone(),
        })
    }

    /// Sign in with email and password.
    ///
    /// A 2xx response that carries no access token is an error: the admin
    /// view must never treat a token-less success as a login.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Rejected`] with the service's own message when
    /// the credentials are refused, [`AuthError::MissingToken`] on a
    /// token-less success, and [`AuthError::Http`]/[`AuthError::Parse`] on
    /// transport or decode failures.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, AuthError> {
        let body = serde_json::json!({ "email": email, "password": password });

        let response = self.client.post(&self.token_url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message: identity_error_message(&text)
                    .unwrap_or_else(|| format!("Sign-in failed with status {}.", status.as_u16())),
            });
        }

        let payload: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Parse(e.to_string()))?;

        match payload.access_token.filter(|t| !t.is_empty()) {
            Some(access_token) => Ok(SignedIn { access_token }),
            None => Err(AuthError::MissingToken),
        }
    }

    /// Revoke the session on the identity service.
    ///
    /// Best effort: callers clear local session state regardless of the
    /// outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service refuses it.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(&self.logout_url)
            .bearer_auth(access_token)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message: identity_error_message(&text)
                    .unwrap_or_else(|| format!("Sign-out failed with status {}.", status.as_u16())),
            });
        }

        Ok(())
    }

    /// Create an account through the signup function.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SignupRejected`] with the function's `error`
    /// field (or a status fallback) on non-2xx responses.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignupAccepted, AuthError> {
        let body = serde_json::json!({ "email": email, "password": password });

        let response = self
            .client
            .post(&self.signup_url)
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            let message = signup_error_message(&text)
                .unwrap_or_else(|| format!("Signup failed with status {}.", status.as_u16()));
            return Err(AuthError::SignupRejected(message));
        }

        let payload: SignupResponse = serde_json::from_str(&text).unwrap_or_default();
        Ok(SignupAccepted {
            user_id: payload.user_id,
        })
    }
}

/// Password grant response body.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Signup function response body.
#[derive(Debug, Default, Deserialize)]
struct SignupResponse {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

/// Identity service error body. The service has used several field names
/// over time; take whichever is present.
#[derive(Debug, Deserialize)]
struct IdentityErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    error: Option<String>,
}

/// Extract a human-readable message from an identity error body.
fn identity_error_message(text: &str) -> Option<String> {
    let body: IdentityErrorBody = serde_json::from_str(text).ok()?;
    body.error_description.or(body.msg).or(body.error)
}

/// Extract the `error` field from a signup function body, falling back to
/// the raw text when it is not JSON.
fn signup_error_message(text: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct Body {
        error: Option<String>,
    }

    match serde_json::from_str::<Body>(text) {
        Ok(body) => body.error,
        Err(_) if !text.is_empty() => Some(text.to_owned()),
        Err(_) => None,
    }
}
