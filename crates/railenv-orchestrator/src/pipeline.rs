use tokio::time::sleep;
use tracing::{info, info_span, warn, Instrument};

use railenv_core::batch::BatchResult;
use railenv_core::client::PlatformClient;
use railenv_core::config::PreviewConfig;
use railenv_core::error::PreviewResult;
use railenv_core::types::{Deployment, TriggerUpdate};

use crate::monitor::DeploymentMonitor;
use crate::propagate::ConfigPropagator;
use crate::redeploy::{RedeployReport, SelectiveRedeployer};
use crate::resolver::EnvironmentResolver;
use crate::triggers::TriggerUpdater;

/// Everything one provisioning run did
#[derive(Debug)]
pub struct RunReport {
    pub environment_id: String,
    pub environment_name: String,
    pub created: bool,
    pub variables: BatchResult<String>,
    pub deployment: Deployment,
    pub triggers: BatchResult<String>,
    pub redeploy: RedeployReport,
    /// Public endpoint of the primary service, if one was identified
    pub service_domain: Option<String>,
}

impl RunReport {
    /// Whether every fan-out member succeeded
    pub fn is_complete(&self) -> bool {
        self.variables.is_complete() && self.triggers.is_complete() && self.redeploy.redeployed.is_complete()
    }
}

/// Provisions one preview environment from one configuration snapshot
pub struct Orchestrator<C> {
    client: C,
    config: PreviewConfig,
}

impl<C: PlatformClient> Orchestrator<C> {
    pub fn new(client: C, config: PreviewConfig) -> Self {
        Self { client, config }
    }

    /// Run the whole sequence, stopping at the first fatal error.
    ///
    /// Resolve, propagate variables, settle, wait for the initial deployment,
    /// retarget triggers, then redeploy. Redeploys are only issued after the
    /// initial deployment succeeded.
    pub async fn run(&self) -> PreviewResult<RunReport> {
        let config = &self.config;
        let client = &self.client;

        let resolution = EnvironmentResolver::new(client)
            .resolve(config)
            .instrument(info_span!("resolve", environment = %config.destination))
            .await?;
        let environment = resolution.environment;

        let variables = ConfigPropagator::new(client, &config.project_id)
            .propagate(&environment.id, &environment.service_instances, &config.variables)
            .instrument(info_span!("propagate", environment_id = %environment.id))
            .await;
        if !variables.is_complete() {
            warn!(
                failed = ?variables.failed_ids(),
                "Variables were not applied to every service"
            );
        }

        if !config.settle_delay.is_zero() {
            info!(
                delay_ms = config.settle_delay.as_millis() as u64,
                "Waiting for the platform to pick up the new environment"
            );
            sleep(config.settle_delay).await;
        }

        let deployment = DeploymentMonitor::new(client, config)
            .wait_for_deployment(&config.destination)
            .instrument(info_span!("monitor", environment = %config.destination))
            .await?;

        let update = TriggerUpdate {
            branch: config.branch.clone(),
            repository: config.repository.clone(),
        };
        let triggers = TriggerUpdater::new(client)
            .retarget(&environment.trigger_ids(), &update)
            .instrument(info_span!("triggers", branch = %config.branch))
            .await;

        let redeploy = SelectiveRedeployer::new(client)
            .redeploy(
                &environment.id,
                &environment.service_instances,
                &config.excluded_services,
                config.primary_service.as_deref(),
            )
            .instrument(info_span!("redeploy", environment_id = %environment.id))
            .await;

        let service_domain = redeploy.primary_domain().map(str::to_string);

        let report = RunReport {
            environment_id: environment.id,
            environment_name: environment.name,
            created: resolution.created,
            variables,
            deployment,
            triggers,
            redeploy,
            service_domain,
        };

        info!(
            environment = %report.environment_name,
            created = report.created,
            complete = report.is_complete(),
            domain = report.service_domain.as_deref().unwrap_or("<none>"),
            "Preview environment ready"
        );

        Ok(report)
    }
}
