//! Decide between reusing, refusing or creating the destination environment.

use tracing::{debug, info, warn};

use railenv_core::client::PlatformClient;
use railenv_core::config::{PreviewConfig, SourceEnvironment};
use railenv_core::error::{PreviewError, PreviewResult};
use railenv_core::types::{find_by_name, CreateEnvironment, Environment};

/// Outcome of environment resolution
#[derive(Debug, Clone)]
pub struct Resolution {
    pub environment: Environment,
    /// Whether this run created the environment
    pub created: bool,
}

pub struct EnvironmentResolver<'a, C: ?Sized> {
    client: &'a C,
}

impl<'a, C: PlatformClient + ?Sized> EnvironmentResolver<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Find the destination environment or clone it from the source.
    ///
    /// Issues at most one creation call. Fails before any creation when the
    /// destination exists and reuse is forbidden.
    pub async fn resolve(&self, config: &PreviewConfig) -> PreviewResult<Resolution> {
        let environments = self.client.list_environments(&config.project_id).await?;

        let matching = environments
            .iter()
            .filter(|env| env.name == config.destination)
            .count();
        if matching > 1 {
            warn!(
                environment = %config.destination,
                count = matching,
                "Several environments share the destination name, using the first"
            );
        }

        if let Some(existing) = find_by_name(&environments, &config.destination) {
            if config.fail_if_exists {
                return Err(PreviewError::EnvironmentAlreadyExists {
                    name: config.destination.clone(),
                });
            }

            info!(
                environment = %existing.name,
                environment_id = %existing.id,
                services = existing.service_instances.len(),
                "Reusing existing environment"
            );
            return Ok(Resolution {
                environment: existing.clone(),
                created: false,
            });
        }

        info!(environment = %config.destination, "Environment does not exist, creating it");
        let source_environment_id = source_environment_id(config, &environments)?;

        let request = CreateEnvironment {
            project_id: config.project_id.clone(),
            name: config.destination.clone(),
            source_environment_id,
        };
        let environment = self.client.create_environment(&request).await?;

        info!(
            environment = %environment.name,
            environment_id = %environment.id,
            services = environment.service_instances.len(),
            triggers = environment.deployment_triggers.len(),
            "Created environment"
        );
        debug!(?environment, "Created environment snapshot");

        Ok(Resolution {
            environment,
            created: true,
        })
    }
}

fn source_environment_id(config: &PreviewConfig, environments: &[Environment]) -> PreviewResult<String> {
    match &config.source {
        Some(SourceEnvironment::Id(id)) => Ok(id.clone()),
        Some(SourceEnvironment::Name(name)) => find_by_name(environments, name)
            .map(|env| env.id.clone())
            .ok_or_else(|| PreviewError::SourceEnvironmentNotFound { name: name.clone() }),
        None => Err(PreviewError::config(format!(
            "Environment '{}' does not exist and no source environment name or id was given",
            config.destination
        ))),
    }
}
