//! Console configuration loaded from environment variables.
//!
//! Every platform endpoint and key must be injected at deploy time; there
//! are no embedded fallback values, and a missing variable fails startup
//! before the listener binds.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TYPHOONX_BASE_URL` - Public URL for the console
//! - `TYPHOONX_PLATFORM_URL` - Base URL of the hosted auth/database platform
//! - `TYPHOONX_ANON_KEY` - Publishable API key sent as the `apikey` header
//! - `TYPHOONX_SIGNUP_FUNCTION_URL` - Signup function endpoint
//! - `TYPHOONX_MERCHANT_LIST_URL` - Merchant list function endpoint
//! - `TYPHOONX_MERCHANT_MANAGE_URL` - Merchant create/manage function endpoint
//!
//! ## Optional
//! - `TYPHOONX_HOST` - Bind address (default: 127.0.0.1)
//! - `TYPHOONX_PORT` - Listen port (default: 3000)
//! - `TYPHOONX_ALLOWED_DOMAIN` - Allowed sign-in email domain (default: wapitee.io)
//! - `TYPHOONX_FEATURE_MERCHANT_CREATE` - Enable the create dialog (default: true)
//! - `TYPHOONX_FEATURE_MERCHANT_DOMAIN` - Show the merchant domain column/field (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Console application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the console
    pub base_url: String,
    /// Platform endpoints and key
    pub platform: PlatformConfig,
    /// The single email domain allowed to sign in
    pub allowed_domain: String,
    /// Page feature flags (the one parameterized implementation replaces
    /// the copy-pasted page revisions of earlier deployments)
    pub features: FeatureFlags,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Hosted platform endpoints and the publishable key.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Platform base URL (identity service lives under `/auth/v1`)
    pub base_url: String,
    /// Publishable API key, sent as the `apikey` header on every call
    pub anon_key: String,
    /// Signup function endpoint
    pub signup_function_url: String,
    /// Merchant list function endpoint
    pub merchant_list_url: String,
    /// Merchant create/manage function endpoint
    pub merchant_manage_url: String,
}

/// Explicit feature flags for the merchant page.
#[derive(Debug, Clone, Copy)]
pub struct FeatureFlags {
    /// Whether the create dialog (and its route) exist
    pub merchant_create: bool,
    /// Whether the merchant domain column and form field are shown
    pub merchant_domain: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            merchant_create: true,
            merchant_domain: true,
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("TYPHOONX_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("TYPHOONX_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("TYPHOONX_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("TYPHOONX_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_url("TYPHOONX_BASE_URL")?;

        let platform = PlatformConfig::from_env()?;

        let allowed_domain = get_env_or_default("TYPHOONX_ALLOWED_DOMAIN", "wapitee.io");
        let features = FeatureFlags::from_env()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            base_url,
            platform,
            allowed_domain,
            features,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl PlatformConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: get_required_url("TYPHOONX_PLATFORM_URL")?,
            anon_key: get_required_env("TYPHOONX_ANON_KEY")?,
            signup_function_url: get_required_url("TYPHOONX_SIGNUP_FUNCTION_URL")?,
            merchant_list_url: get_required_url("TYPHOONX_MERCHANT_LIST_URL")?,
            merchant_manage_url: get_required_url("TYPHOONX_MERCHANT_MANAGE_URL")?,
        })
    }
}

impl FeatureFlags {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            merchant_create: get_bool_env("TYPHOONX_FEATURE_MERCHANT_CREATE", true)?,
            merchant_domain: get_bool_env("TYPHOONX_FEATURE_MERCHANT_DOMAIN", true)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable that must parse as an absolute URL.
fn get_required_url(key: &str) -> Result<String, ConfigError> {
    let value = get_required_env(key)?;
    Url::parse(&value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    Ok(value)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a boolean environment variable with a default value.
fn get_bool_env(key: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(key) {
        Ok(value) => parse_bool(&value)
            .ok_or_else(|| ConfigError::InvalidEnvVar(key.to_string(), value.clone())),
        Err(_) => Ok(default),
    }
}

/// Parse a boolean flag value. Accepts the usual spellings.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
