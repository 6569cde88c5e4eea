use std::sync::Arc;

use async_trait::async_trait;

use crate::error::PreviewResult;
use crate::types::{CreateEnvironment, Environment, TriggerUpdate, VariableSet};

/// Request/response boundary to the deployment platform.
///
/// Implementations own transport concerns (authentication, encoding,
/// timeouts). Every method is a single remote call.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// List every environment of a project, with services, triggers and deployments
    async fn list_environments(&self, project_id: &str) -> PreviewResult<Vec<Environment>>;

    /// Clone a new environment from a source environment
    async fn create_environment(&self, request: &CreateEnvironment) -> PreviewResult<Environment>;

    /// Upsert a variable collection scoped to one service of one environment
    async fn upsert_variables(
        &self,
        project_id: &str,
        environment_id: &str,
        service_id: &str,
        variables: &VariableSet,
    ) -> PreviewResult<()>;

    /// Point a deployment trigger at a new branch
    async fn update_deployment_trigger(&self, trigger_id: &str, update: &TriggerUpdate) -> PreviewResult<()>;

    /// Redeploy one service instance
    async fn redeploy_service(&self, environment_id: &str, service_id: &str) -> PreviewResult<()>;

    /// Look up the human name of a service
    async fn service_name(&self, service_id: &str) -> PreviewResult<String>;

    /// Delete an environment
    async fn delete_environment(&self, environment_id: &str) -> PreviewResult<()>;
}

#[async_trait]
impl<T: PlatformClient + ?Sized> PlatformClient for Arc<T> {
    async fn list_environments(&self, project_id: &str) -> PreviewResult<Vec<Environment>> {
        (**self).list_environments(project_id).await
    }

    async fn create_environment(&self, request: &CreateEnvironment) -> PreviewResult<Environment> {
        (**self).create_environment(request).await
    }

    async fn upsert_variables(
        &self,
        project_id: &str,
        environment_id: &str,
        service_id: &str,
        variables: &VariableSet,
    ) -> PreviewResult<()> {
        (**self)
            .upsert_variables(project_id, environment_id, service_id, variables)
            .await
    }

    async fn update_deployment_trigger(&self, trigger_id: &str, update: &TriggerUpdate) -> PreviewResult<()> {
        (**self).update_deployment_trigger(trigger_id, update).await
    }

    async fn redeploy_service(&self, environment_id: &str, service_id: &str) -> PreviewResult<()> {
        (**self).redeploy_service(environment_id, service_id).await
    }

    async fn service_name(&self, service_id: &str) -> PreviewResult<String> {
        (**self).service_name(service_id).await
    }

    async fn delete_environment(&self, environment_id: &str) -> PreviewResult<()> {
        (**self).delete_environment(environment_id).await
    }
}

#[async_trait]
impl<'a, T: PlatformClient + ?Sized> PlatformClient for &'a T {
    async fn list_environments(&self, project_id: &str) -> PreviewResult<Vec<Environment>> {
        (**self).list_environments(project_id).await
    }

    async fn create_environment(&self, request: &CreateEnvironment) -> PreviewResult<Environment> {
        (**self).create_environment(request).await
    }

    async fn upsert_variables(
        &self,
        project_id: &str,
        environment_id: &str,
        service_id: &str,
        variables: &VariableSet,
    ) -> PreviewResult<()> {
        (**self)
            .upsert_variables(project_id, environment_id, service_id, variables)
            .await
    }

    async fn update_deployment_trigger(&self, trigger_id: &str, update: &TriggerUpdate) -> PreviewResult<()> {
        (**self).update_deployment_trigger(trigger_id, update).await
    }

    async fn redeploy_service(&self, environment_id: &str, service_id: &str) -> PreviewResult<()> {
        (**self).redeploy_service(environment_id, service_id).await
    }

    async fn service_name(&self, service_id: &str) -> PreviewResult<String> {
        (**self).service_name(service_id).await
    }

    async fn delete_environment(&self, environment_id: &str) -> PreviewResult<()> {
        (**self).delete_environment(environment_id).await
    }
}
