use railenv_core::error::PreviewError;

/// Result type for Railway API calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Railway API error types
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connection, TLS or timeout failure
    #[error("Network error: {0}")]
    Network(String),

    /// Token missing, expired or lacking access to the project
    #[error("Unauthorized (HTTP {status}): {body}")]
    Unauthorized { status: u16, body: String },

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response carried GraphQL errors
    #[error("GraphQL error in {operation}: {messages}")]
    GraphQl { operation: String, messages: String },

    /// The response had neither data nor errors
    #[error("No data returned for {0}")]
    MissingData(String),

    /// A mutation reported it did not apply
    #[error("{0} was rejected by the platform")]
    Rejected(String),

    /// The response body did not match the expected shape
    #[error("Invalid response for {operation}: {message}")]
    Decode { operation: String, message: String },

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidEndpoint(err.to_string())
    }
}

impl From<ApiError> for PreviewError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Unauthorized { .. } => PreviewError::unauthorized(error.to_string()),
            ApiError::InvalidEndpoint(msg) => PreviewError::config(format!("Invalid API endpoint: {}", msg)),
            other => PreviewError::transport(other.to_string()),
        }
    }
}
