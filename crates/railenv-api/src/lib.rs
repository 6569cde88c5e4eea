//! Railway GraphQL client for railenv.
//!
//! Implements [`railenv_core::PlatformClient`] on top of the Railway public
//! API. Transport concerns live here and nowhere else.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

mod client;
mod error;
mod queries;
mod schema;

pub use client::{RailwayClient, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
pub use error::{ApiError, ApiResult};

/// Public GraphQL endpoint of Railway
pub const DEFAULT_ENDPOINT: &str = "https://backboard.railway.app/graphql/v2";

/// Configuration for the API client
#[derive(Clone)]
pub struct ApiConfig {
    /// GraphQL endpoint
    pub endpoint: Url,
    /// Bearer token
    pub token: String,
    /// Timeout for a whole request
    pub request_timeout: Duration,
    /// Timeout for establishing a connection
    pub connect_timeout: Duration,
}

impl ApiConfig {
    /// Configuration for the public endpoint
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            token: token.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Point the client at another endpoint
    pub fn with_endpoint(mut self, endpoint: &str) -> ApiResult<Self> {
        self.endpoint = Url::parse(endpoint)?;
        Ok(self)
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Create a shared client
pub fn create_client(config: ApiConfig) -> ApiResult<Arc<RailwayClient>> {
    Ok(Arc::new(RailwayClient::new(config)?))
}
