use tracing::info;

use railenv_core::batch::BatchResult;
use railenv_core::client::PlatformClient;
use railenv_core::types::{ServiceInstance, VariableSet};

use crate::fanout::fan_out;

/// Broadcasts a variable set to every service of an environment
pub struct ConfigPropagator<'a, C: ?Sized> {
    client: &'a C,
    project_id: &'a str,
}

impl<'a, C: PlatformClient + ?Sized> ConfigPropagator<'a, C> {
    pub fn new(client: &'a C, project_id: &'a str) -> Self {
        Self { client, project_id }
    }

    /// Upsert `variables` once per service instance, concurrently and best-effort
    pub async fn propagate(
        &self,
        environment_id: &str,
        service_instances: &[ServiceInstance],
        variables: &VariableSet,
    ) -> BatchResult<String> {
        info!(
            environment_id,
            services = service_instances.len(),
            variables = variables.len(),
            "Propagating variables"
        );

        let service_ids = service_instances
            .iter()
            .map(|instance| instance.service_id.clone())
            .collect();

        let client = self.client;
        let project_id = self.project_id;
        fan_out("variables", service_ids, |service_id| async move {
            client
                .upsert_variables(project_id, environment_id, &service_id, variables)
                .await
        })
        .await
    }
}
