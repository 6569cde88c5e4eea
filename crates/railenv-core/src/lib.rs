//! Core types and traits for railenv.
//!
//! This crate holds the data model of a deployment platform project, the
//! configuration snapshot of a provisioning run, the error taxonomy and the
//! [`PlatformClient`] boundary every other crate builds on.

pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use crate::batch::BatchResult;
pub use crate::client::PlatformClient;
pub use crate::config::{PreviewConfig, PreviewSettings, SourceEnvironment};
pub use crate::error::{PreviewError, PreviewResult};
pub use crate::logging::{init_logging, LogFormat, LogLevel};
pub use crate::types::{
    CreateEnvironment, Deployment, DeploymentStatus, DeploymentTrigger, Environment, ServiceDomain,
    ServiceInstance, TriggerUpdate, VariableSet,
};
