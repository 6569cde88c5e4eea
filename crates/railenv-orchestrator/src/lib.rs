//! Preview environment provisioning workflow.
//!
//! Each stage is a small component over a [`PlatformClient`](railenv_core::PlatformClient);
//! [`Orchestrator`] runs them in order.

mod fanout;
pub mod monitor;
pub mod pipeline;
pub mod propagate;
pub mod redeploy;
pub mod resolver;
pub mod triggers;

pub use monitor::{evaluate, DeploymentMonitor, PollAction, PollFailure};
pub use pipeline::{Orchestrator, RunReport};
pub use propagate::ConfigPropagator;
pub use redeploy::{PrimaryService, RedeployReport, SelectiveRedeployer, FALLBACK_PRIMARY_NAMES};
pub use resolver::{EnvironmentResolver, Resolution};
pub use triggers::TriggerUpdater;
