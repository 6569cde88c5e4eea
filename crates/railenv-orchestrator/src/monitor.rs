//! Polls the destination environment until its initial deployment settles.
//!
//! Only the first deployment listed for the environment is tracked. Queued or
//! concurrent deployments beyond it are not reconciled.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use railenv_core::client::PlatformClient;
use railenv_core::config::PreviewConfig;
use railenv_core::error::{PreviewError, PreviewResult};
use railenv_core::types::{find_by_name, Deployment, DeploymentStatus, Environment};

/// What the monitor does after observing a status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollAction {
    /// Wait one interval and poll again
    Continue,
    /// The deployment succeeded
    Succeed,
    /// Stop polling with a failure
    Fail(PollFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollFailure {
    DeploymentFailed,
    UnrecognizedStatus(String),
    Timeout,
}

/// Transition function of the monitor.
///
/// Terminal and unknown statuses decide immediately; a recognized in-progress
/// status keeps polling until `elapsed` exceeds `timeout`.
pub fn evaluate(status: &DeploymentStatus, elapsed: Duration, timeout: Duration) -> PollAction {
    match status {
        DeploymentStatus::Success => PollAction::Succeed,
        DeploymentStatus::Failed => PollAction::Fail(PollFailure::DeploymentFailed),
        DeploymentStatus::Unrecognized(raw) => PollAction::Fail(PollFailure::UnrecognizedStatus(raw.clone())),
        DeploymentStatus::Queued
        | DeploymentStatus::Initializing
        | DeploymentStatus::Waiting
        | DeploymentStatus::Building
        | DeploymentStatus::Deploying => {
            if elapsed > timeout {
                PollAction::Fail(PollFailure::Timeout)
            } else {
                PollAction::Continue
            }
        }
    }
}

pub struct DeploymentMonitor<'a, C: ?Sized> {
    client: &'a C,
    project_id: &'a str,
    poll_interval: Duration,
    timeout: Duration,
}

impl<'a, C: PlatformClient + ?Sized> DeploymentMonitor<'a, C> {
    pub fn new(client: &'a C, config: &'a PreviewConfig) -> Self {
        Self {
            client,
            project_id: &config.project_id,
            poll_interval: config.poll_interval,
            timeout: config.poll_timeout,
        }
    }

    /// Poll until the tracked deployment of `environment_name` succeeds.
    ///
    /// Returns the successful deployment. Every other terminal outcome is an
    /// error: failure, unknown status, timeout, the environment or its
    /// deployment disappearing.
    pub async fn wait_for_deployment(&self, environment_name: &str) -> PreviewResult<Deployment> {
        let started = Instant::now();
        let mut polls: u32 = 0;

        loop {
            let elapsed = started.elapsed();
            if elapsed > self.timeout {
                return Err(self.timeout_error(environment_name, elapsed));
            }

            polls += 1;
            let environments = self.client.list_environments(self.project_id).await?;
            let environment = find_by_name(&environments, environment_name).ok_or_else(|| {
                PreviewError::EnvironmentVanished {
                    name: environment_name.to_string(),
                }
            })?;
            let deployment = environment
                .tracked_deployment()
                .ok_or_else(|| PreviewError::NoDeploymentFound {
                    name: environment_name.to_string(),
                })?;

            let elapsed = started.elapsed();
            debug!(
                environment = environment_name,
                deployment_id = %deployment.id,
                status = %deployment.status,
                poll = polls,
                "Observed deployment status"
            );

            match evaluate(&deployment.status, elapsed, self.timeout) {
                PollAction::Continue => {
                    info!(
                        environment = environment_name,
                        status = %deployment.status,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "Deployment in progress, polling again in {}ms",
                        self.poll_interval.as_millis()
                    );
                    sleep(self.poll_interval).await;
                }
                PollAction::Succeed => {
                    info!(
                        environment = environment_name,
                        deployment_id = %deployment.id,
                        polls,
                        "Deployment succeeded"
                    );
                    return Ok(deployment.clone());
                }
                PollAction::Fail(PollFailure::DeploymentFailed) => {
                    return Err(PreviewError::DeploymentFailed {
                        environment: environment_name.to_string(),
                        deployment_id: deployment.id.clone(),
                    });
                }
                PollAction::Fail(PollFailure::UnrecognizedStatus(status)) => {
                    return Err(PreviewError::UnrecognizedDeploymentStatus {
                        environment: environment_name.to_string(),
                        status,
                        raw: raw_snapshot(environment),
                    });
                }
                PollAction::Fail(PollFailure::Timeout) => {
                    return Err(self.timeout_error(environment_name, elapsed));
                }
            }
        }
    }

    fn timeout_error(&self, environment_name: &str, elapsed: Duration) -> PreviewError {
        PreviewError::MonitorTimeout {
            environment: environment_name.to_string(),
            elapsed,
            timeout: self.timeout,
        }
    }
}

fn raw_snapshot(environment: &Environment) -> String {
    serde_json::to_string(environment).unwrap_or_else(|e| format!("<unserializable: {}>", e))
}
