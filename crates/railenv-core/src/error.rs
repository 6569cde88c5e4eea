use std::io;
use std::time::Duration;
use thiserror::Error;

/// Result type for preview environment operations
pub type PreviewResult<T> = Result<T, PreviewError>;

/// Error type for preview environment operations
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("Environment '{name}' already exists. Delete it via the API or the Railway dashboard and try again")]
    EnvironmentAlreadyExists { name: String },

    #[error("Source environment '{name}' not found in project")]
    SourceEnvironmentNotFound { name: String },

    #[error("Environment '{name}' not found in project")]
    EnvironmentNotFound { name: String },

    #[error("Timed out after {}ms waiting for deployment of '{environment}' (limit {}ms)", .elapsed.as_millis(), .timeout.as_millis())]
    MonitorTimeout {
        environment: String,
        elapsed: Duration,
        timeout: Duration,
    },

    #[error("Deployment {deployment_id} of environment '{environment}' failed")]
    DeploymentFailed {
        environment: String,
        deployment_id: String,
    },

    #[error("Unrecognized deployment status '{status}' for environment '{environment}': {raw}")]
    UnrecognizedDeploymentStatus {
        environment: String,
        status: String,
        raw: String,
    },

    #[error("Environment '{name}' disappeared while waiting for its deployment")]
    EnvironmentVanished { name: String },

    #[error("No deployment found for environment '{name}'")]
    NoDeploymentFound { name: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl PreviewError {
    /// Create a new transport error
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        PreviewError::Transport(msg.into())
    }

    /// Create a new authorization error
    pub fn unauthorized<S: Into<String>>(msg: S) -> Self {
        PreviewError::Unauthorized(msg.into())
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        PreviewError::Config(msg.into())
    }

    /// Create a new serialization error
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        PreviewError::Serialization(msg.into())
    }

    /// Whether the error comes from bad or missing inputs rather than the platform
    pub fn is_config(&self) -> bool {
        matches!(self, PreviewError::Config(_))
    }
}

impl From<serde_json::Error> for PreviewError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for PreviewError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<io::Error> for PreviewError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
