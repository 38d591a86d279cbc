//! Merchant directory client.
//!
//! Performs the authorized calls against the managed merchant functions.
//! Every call carries the caller's bearer token plus the static `apikey`
//! header. Obtaining a token is the caller's problem: handlers go through
//! the `RequireToken` extractor first, so this client is never invoked
//! unauthenticated and performs no network call without a token in hand.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use thiserror::Error;

use typhoonx_core::{Merchant, NewMerchant, UserId};

use crate::config::PlatformConfig;

/// Errors that can occur when talking to the merchant functions.
///
/// Surfaced as a page-level or dialog-level message; never retried
/// automatically. An expired or revoked token shows up here as a plain
/// [`DirectoryError::Api`] like any other upstream failure.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The request never completed (connect, timeout, TLS).
    #[error("Network error, please try again later.")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response; carries the body text, or a status fallback when
    /// the body was empty.
    #[error("{0}")]
    Api(String),

    /// A 2xx envelope with `success: false`.
    #[error("{}", .message.as_deref().unwrap_or("The merchant service reported a failure."))]
    Rejected {
        /// Message from the envelope, when the function provided one.
        message: Option<String>,
    },

    /// A response body could not be decoded.
    #[error("Unexpected response from the merchant service.")]
    Parse(String),
}

/// Envelope returned by the merchant list function.
#[derive(Debug, Deserialize)]
pub struct MerchantListResponse {
    pub success: bool,
    #[serde(default)]
    pub merchants: Vec<Merchant>,
    #[serde(default)]
    pub merchant_count: Option<u64>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Envelope returned by the merchant manage function.
#[derive(Debug, Deserialize)]
struct ManageResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Client for the managed merchant functions.
#[derive(Clone)]
pub struct MerchantDirectoryClient {
    client: reqwest::Client,
    list_url: String,
    manage_url: String,
}

impl MerchantDirectoryClient {
    /// Create a new merchant directory client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &PlatformConfig) -> Result<Self, DirectoryError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(&config.anon_key)
                .map_err(|e| DirectoryError::Parse(format!("invalid API key format: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            list_url: config.merchant_list_url.clone(),
            manage_url: config.merchant_manage_url.clone(),
        })
    }

    /// Fetch the merchant list.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Api`] on non-2xx responses (carrying the
    /// body text), [`DirectoryError::Rejected`] when a 2xx envelope has
    /// `success: false`, and [`DirectoryError::Http`]/
    /// [`DirectoryError::Parse`] on transport or decode failures.
    pub async fn list(&self, access_token: &str) -> Result<Vec<Merchant>, DirectoryError> {
        let response = self
            .client
            .get(&self.list_url)
            .bearer_auth(access_token)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Api(non_success_message(
                status.as_u16(),
                &text,
            )));
        }

        let envelope: MerchantListResponse = response
            .json()
            .await
            .map_err(|e| DirectoryError::Parse(e.to_string()))?;

        if !envelope.success {
            return Err(DirectoryError::Rejected { message: None });
        }

        Ok(envelope.merchants)
    }

    /// Create a merchant.
    ///
    /// On success the caller re-fetches the full list; there is no
    /// incremental local update.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::list`]; a `success: false` envelope
    /// surfaces the function's `message` when present.
    pub async fn create(
        &self,
        access_token: &str,
        merchant: &NewMerchant,
    ) -> Result<(), DirectoryError> {
        let response = self
            .client
            .post(&self.manage_url)
            .bearer_auth(access_token)
            .json(merchant)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Api(non_success_message(
                status.as_u16(),
                &text,
            )));
        }

        let envelope: ManageResponse = response
            .json()
            .await
            .map_err(|e| DirectoryError::Parse(e.to_string()))?;

        if !envelope.success {
            return Err(DirectoryError::Rejected {
                message: envelope.message,
            });
        }

        Ok(())
    }
}

/// Message for a non-2xx response: the body text when there is one, else a
/// status-code fallback.
fn non_success_message(status: u16, body: &str) -> String {
    if body.is_empty() {
        format!("Request failed with status {status}.")
    } else {
        body.to_owned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_list_envelope_parses() {
        let json = r#"{
            "success": true,
            "user_email": "admin@wapitee.io",
            "user_id": "u-1",
            "merchant_count": 1,
            "merchants": [{
                "merchant_id": "m1",
                "merchant_name": "Acme",
                "status": "active",
                "created_at": "2024-01-01T00:00:00Z"
            }],
            "timestamp": "2024-01-02T00:00:00Z"
        }"#;

        let envelope: MerchantListResponse = serde_json::from_str(json).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.merchants.len(), 1);
        assert_eq!(envelope.merchants[0].merchant_name, "Acme");
        assert_eq!(envelope.merchant_count, Some(1));
    }

    #[test]
    fn test_list_envelope_missing_merchants_defaults_empty() {
        let envelope: MerchantListResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(envelope.success);
        assert!(envelope.merchants.is_empty());
    }

    #[test]
    fn test_rejected_envelope_is_not_an_empty_ready_state() {
        // success:false must become an error, never Ready with no rows
        let envelope: MerchantListResponse =
            serde_json::from_str(r#"{"success":false,"merchants":[]}"#).unwrap();
        assert!(!envelope.success);
    }

    #[test]
    fn test_manage_envelope_failure_message() {
        let envelope: ManageResponse =
            serde_json::from_str(r#"{"success":false,"message":"merchant exists"}"#).unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.message.as_deref(), Some("merchant exists"));
    }

    #[test]
    fn test_non_success_message_prefers_body() {
        assert_eq!(non_success_message(500, "boom"), "boom");
        assert_eq!(
            non_success_message(502, ""),
            "Request failed with status 502."
        );
    }

    #[test]
    fn test_rejected_error_display() {
        let with_message = DirectoryError::Rejected {
            message: Some("merchant exists".to_owned()),
        };
        assert_eq!(with_message.to_string(), "merchant exists");

        let without_message = DirectoryError::Rejected { message: None };
        assert_eq!(
            without_message.to_string(),
            "The merchant service reported a failure."
        );
    }
}
