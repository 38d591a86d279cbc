//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::services::auth::{AuthError, AuthGatewayClient};
use crate::services::directory::{DirectoryError, MerchantDirectoryClient};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateInitError {
    #[error("auth gateway client: {0}")]
    Auth(#[from] AuthError),
    #[error("merchant directory client: {0}")]
    Directory(#[from] DirectoryError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the platform clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    auth: AuthGatewayClient,
    directory: MerchantDirectoryClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if either platform client fails to build.
    pub fn new(config: AdminConfig) -> Result<Self, StateInitError> {
        let auth = AuthGatewayClient::new(&config.platform)?;
        let directory = MerchantDirectoryClient::new(&config.platform)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                directory,
            }),
        })
    }

    /// Get a reference to the console configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the auth gateway client.
    #[must_use]
    pub fn auth(&self) -> &AuthGatewayClient {
        &self.inner.auth
    }

    /// Get a reference to the merchant directory client.
    #[must_use]
    pub fn directory(&self) -> &MerchantDirectoryClient {
        &self.inner.directory
    }
}
