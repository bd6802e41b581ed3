//! Web server state

use crate::api_client::{ApiClient, ClientError};
use scoutline_core::Config;

/// State shared by the web server handlers
#[derive(Debug, Clone)]
pub struct WebState {
    /// Application configuration
    pub config: Config,
    /// Client for the backend API
    pub api: ApiClient,
}

impl WebState {
    /// Build state with a client for `config.client.api_base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self, ClientError> {
        let api = ApiClient::new(&config.client)?;
        Ok(Self { config, api })
    }

    /// Build state around an existing client
    #[must_use]
    pub const fn with_client(config: Config, api: ApiClient) -> Self {
        Self { config, api }
    }
}
