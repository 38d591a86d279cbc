//! Platform admin identity client.
//!
//! Creates user accounts through the platform's admin API using the
//! service-role key. This client never handles end-user tokens; it is the
//! privileged half of the signup flow.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use crate::config::FunctionsConfig;

/// Errors that can occur when creating accounts on the platform.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform refused the request.
    #[error("{message}")]
    Api {
        /// HTTP status returned by the platform.
        status: u16,
        /// The platform's own message, or a status fallback.
        message: String,
    },

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// A newly created account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedUser {
    /// The platform user id.
    pub id: String,
    /// Echoed email, when the platform includes it.
    #[serde(default)]
    pub email: Option<String>,
}

/// Client for the platform's admin identity API.
#[derive(Clone)]
pub struct IdentityAdminClient {
    client: reqwest::Client,
    create_user_url: String,
}

impl IdentityAdminClient {
    /// Create a new admin identity client.
    ///
    /// # Errors
    ///
    /// Returns an error if the service-role key is not a valid header value
    /// or the HTTP client fails to build.
    pub fn new(config: &FunctionsConfig) -> Result<Self, IdentityError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            secret_header(&config.service_role_key)
                .map_err(|e| IdentityError::Parse(format!("invalid service key format: {e}")))?,
        );
        headers.insert(
            reqwest::header::AUTHORIZATION,
            bearer_header(&config.service_role_key)
                .map_err(|e| IdentityError::Parse(format!("invalid service key format: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let base = config.platform_url.trim_end_matches('/');

        Ok(Self {
            client,
            create_user_url: format!("{base}/auth/v1/admin/users"),
        })
    }

    /// Create a user account.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Api`] with the platform's message when the
    /// account cannot be created (already exists, policy violation, ...).
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        email_confirm: bool,
    ) -> Result<CreatedUser, IdentityError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "email_confirm": email_confirm,
        });

        let response = self
            .client
            .post(&self.create_user_url)
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(IdentityError::Api {
                status: status.as_u16(),
                message: platform_error_message(&text)
                    .unwrap_or_else(|| format!("Account creation failed with status {}.", status.as_u16())),
            });
        }

        response
            .json()
            .await
            .map_err(|e| IdentityError::Parse(e.to_string()))
    }
}

/// Platform error body; field names have varied across revisions.
#[derive(Debug, Deserialize)]
struct PlatformErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    error: Option<String>,
}

/// Extract a human-readable message from a platform error body.
fn platform_error_message(text: &str) -> Option<String> {
    let body: PlatformErrorBody = serde_json::from_str(text).ok()?;
    body.error_description.or(body.msg).or(body.error)
}

/// Build a raw header value from a secret.
fn secret_header(secret: &SecretString) -> Result<HeaderValue, reqwest::header::InvalidHeaderValue> {
    let mut value = HeaderValue::from_str(secret.expose_secret())?;
    value.set_sensitive(true);
    Ok(value)
}

/// Build a bearer header value from a secret.
fn bearer_header(secret: &SecretString) -> Result<HeaderValue, reqwest::header::InvalidHeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", secret.expose_secret()))?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_created_user_parses() {
        let user: CreatedUser =
            serde_json::from_str(r#"{"id":"u-1","email":"a@wapitee.io","role":""}"#).unwrap();
        assert_eq!(user.id, "u-1");
        assert_eq!(user.email.as_deref(), Some("a@wapitee.io"));
    }

    #[test]
    fn test_platform_error_message_variants() {
        assert_eq!(
            platform_error_message(r#"{"msg":"User already registered"}"#).as_deref(),
            Some("User already registered")
        );
        assert_eq!(
            platform_error_message(r#"{"error":"invalid_request"}"#).as_deref(),
            Some("invalid_request")
        );
        assert!(platform_error_message("not json").is_none());
    }
}
