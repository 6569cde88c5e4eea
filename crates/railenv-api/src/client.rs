use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, trace};
use url::Url;

use railenv_core::client::PlatformClient;
use railenv_core::error::PreviewResult;
use railenv_core::types::{CreateEnvironment, Environment, TriggerUpdate, VariableSet};

use crate::error::{ApiError, ApiResult};
use crate::queries;
use crate::schema::{
    DeploymentTriggerUpdateData, EnvironmentCreateData, EnvironmentDeleteData, EnvironmentsData,
    GraphQlRequest, GraphQlResponse, ServiceData, ServiceInstanceRedeployData,
    VariableCollectionUpsertData,
};
use crate::ApiConfig;

/// Railway public API client
#[derive(Clone)]
pub struct RailwayClient {
    client: Client,
    endpoint: Url,
    token: String,
}

impl std::fmt::Debug for RailwayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RailwayClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl RailwayClient {
    /// Create a new Railway client
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(concat!("railenv/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            token: config.token,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Execute one GraphQL document and decode its `data` member
    pub async fn request<T: DeserializeOwned>(
        &self,
        operation: &str,
        document: &str,
        variables: Value,
    ) -> ApiResult<T> {
        debug!(operation, "Sending GraphQL request");
        trace!(operation, %variables, "GraphQL variables");

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.token)
            .json(&GraphQlRequest {
                query: document,
                variables,
            })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Unauthorized {
                status: status.as_u16(),
                body,
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        let envelope: GraphQlResponse<T> = serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
            operation: operation.to_string(),
            message: e.to_string(),
        })?;

        if !envelope.errors.is_empty() {
            let messages = envelope
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ApiError::GraphQl {
                operation: operation.to_string(),
                messages,
            });
        }

        envelope
            .data
            .ok_or_else(|| ApiError::MissingData(operation.to_string()))
    }
}

fn accepted(operation: &str, applied: bool) -> ApiResult<()> {
    if applied {
        Ok(())
    } else {
        Err(ApiError::Rejected(operation.to_string()))
    }
}

#[async_trait]
impl PlatformClient for RailwayClient {
    async fn list_environments(&self, project_id: &str) -> PreviewResult<Vec<Environment>> {
        let data: EnvironmentsData = self
            .request("environments", queries::ENVIRONMENTS, json!({ "projectId": project_id }))
            .await?;

        Ok(data
            .environments
            .edges
            .into_iter()
            .map(|edge| edge.node.into_environment(""))
            .collect())
    }

    async fn create_environment(&self, request: &CreateEnvironment) -> PreviewResult<Environment> {
        let data: EnvironmentCreateData = self
            .request(
                "environmentCreate",
                queries::ENVIRONMENT_CREATE,
                json!({ "input": request }),
            )
            .await?;

        Ok(data.environment_create.into_environment(&request.name))
    }

    async fn upsert_variables(
        &self,
        project_id: &str,
        environment_id: &str,
        service_id: &str,
        variables: &VariableSet,
    ) -> PreviewResult<()> {
        let data: VariableCollectionUpsertData = self
            .request(
                "variableCollectionUpsert",
                queries::VARIABLE_COLLECTION_UPSERT,
                json!({
                    "input": {
                        "projectId": project_id,
                        "environmentId": environment_id,
                        "serviceId": service_id,
                        "variables": variables,
                    }
                }),
            )
            .await?;

        Ok(accepted("variableCollectionUpsert", data.variable_collection_upsert)?)
    }

    async fn update_deployment_trigger(&self, trigger_id: &str, update: &TriggerUpdate) -> PreviewResult<()> {
        let _: DeploymentTriggerUpdateData = self
            .request(
                "deploymentTriggerUpdate",
                queries::DEPLOYMENT_TRIGGER_UPDATE,
                json!({ "id": trigger_id, "input": update }),
            )
            .await?;
        Ok(())
    }

    async fn redeploy_service(&self, environment_id: &str, service_id: &str) -> PreviewResult<()> {
        let data: ServiceInstanceRedeployData = self
            .request(
                "serviceInstanceRedeploy",
                queries::SERVICE_INSTANCE_REDEPLOY,
                json!({ "environmentId": environment_id, "serviceId": service_id }),
            )
            .await?;

        Ok(accepted("serviceInstanceRedeploy", data.service_instance_redeploy)?)
    }

    async fn service_name(&self, service_id: &str) -> PreviewResult<String> {
        let data: ServiceData = self
            .request("service", queries::SERVICE, json!({ "id": service_id }))
            .await?;
        Ok(data.service.name)
    }

    async fn delete_environment(&self, environment_id: &str) -> PreviewResult<()> {
        let data: EnvironmentDeleteData = self
            .request(
                "environmentDelete",
                queries::ENVIRONMENT_DELETE,
                json!({ "id": environment_id }),
            )
            .await?;

        Ok(accepted("environmentDelete", data.environment_delete)?)
    }
}

/// Default timeout for a single request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Default timeout for establishing a connection
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
