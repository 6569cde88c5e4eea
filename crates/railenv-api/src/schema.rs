//! Response shapes of the Railway API and their mapping onto the core model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use railenv_core::types::{
    Deployment, DeploymentStatus, DeploymentTrigger, Environment, ServiceDomain, ServiceInstance,
};

/// Request body of every GraphQL call
#[derive(Debug, Serialize)]
pub(crate) struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: Value,
}

/// Response envelope of every GraphQL call
#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
}

/// Relay style connection
#[derive(Debug, Deserialize)]
pub(crate) struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Edge<T> {
    pub node: T,
}

fn flatten<T, U: From<T>>(connection: Option<Connection<T>>) -> Vec<U> {
    connection
        .map(|c| c.edges.into_iter().map(|edge| U::from(edge.node)).collect())
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EnvironmentNode {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub service_instances: Option<Connection<ServiceInstanceNode>>,
    #[serde(default)]
    pub deployment_triggers: Option<Connection<DeploymentTriggerNode>>,
    #[serde(default)]
    pub deployments: Option<Connection<DeploymentNode>>,
}

impl EnvironmentNode {
    /// Map onto the core model; `fallback_name` covers mutations that do not
    /// echo the name back
    pub fn into_environment(self, fallback_name: &str) -> Environment {
        Environment {
            id: self.id,
            name: self.name.unwrap_or_else(|| fallback_name.to_string()),
            created_at: self.created_at,
            service_instances: flatten(self.service_instances),
            deployment_triggers: flatten(self.deployment_triggers),
            deployments: flatten(self.deployments),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ServiceInstanceNode {
    pub id: String,
    pub service_id: String,
    #[serde(default)]
    pub start_command: Option<String>,
    #[serde(default)]
    pub domains: Option<DomainsNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DomainsNode {
    #[serde(default)]
    pub service_domains: Vec<ServiceDomainNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServiceDomainNode {
    #[serde(default)]
    pub id: Option<String>,
    pub domain: String,
}

impl From<ServiceInstanceNode> for ServiceInstance {
    fn from(node: ServiceInstanceNode) -> Self {
        let domains = node
            .domains
            .map(|d| d.service_domains)
            .unwrap_or_default()
            .into_iter()
            .map(|d| ServiceDomain {
                id: d.id,
                domain: d.domain,
            })
            .collect();

        ServiceInstance {
            id: node.id,
            service_id: node.service_id,
            domains,
            start_command: node.start_command,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeploymentTriggerNode {
    pub id: String,
    pub environment_id: String,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
}

impl From<DeploymentTriggerNode> for DeploymentTrigger {
    fn from(node: DeploymentTriggerNode) -> Self {
        DeploymentTrigger {
            id: node.id,
            environment_id: node.environment_id,
            branch: node.branch,
            provider: node.provider,
            repository: node.repository,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeploymentNode {
    pub id: String,
    pub status: String,
}

impl From<DeploymentNode> for Deployment {
    fn from(node: DeploymentNode) -> Self {
        Deployment {
            id: node.id,
            status: DeploymentStatus::parse(&node.status),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnvironmentsData {
    pub environments: Connection<EnvironmentNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EnvironmentCreateData {
    pub environment_create: EnvironmentNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VariableCollectionUpsertData {
    pub variable_collection_upsert: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeploymentTriggerUpdateData {
    pub deployment_trigger_update: IdNode,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IdNode {
    #[allow(dead_code)]
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ServiceInstanceRedeployData {
    pub service_instance_redeploy: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServiceData {
    pub service: ServiceNode,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServiceNode {
    #[allow(dead_code)]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EnvironmentDeleteData {
    pub environment_delete: bool,
}
