//! GraphQL documents sent to the Railway public API.

pub const ENVIRONMENTS: &str = r#"
query environments($projectId: String!) {
  environments(projectId: $projectId) {
    edges {
      node {
        id
        name
        createdAt
        serviceInstances {
          edges {
            node {
              id
              serviceId
              startCommand
              domains {
                serviceDomains {
                  id
                  domain
                }
              }
            }
          }
        }
        deploymentTriggers {
          edges {
            node {
              id
              environmentId
              branch
              provider
              repository
            }
          }
        }
        deployments {
          edges {
            node {
              id
              status
            }
          }
        }
      }
    }
  }
}
"#;

pub const ENVIRONMENT_CREATE: &str = r#"
mutation environmentCreate($input: EnvironmentCreateInput!) {
  environmentCreate(input: $input) {
    id
    name
    createdAt
    deploymentTriggers {
      edges {
        node {
          id
          environmentId
          branch
          provider
          repository
        }
      }
    }
    serviceInstances {
      edges {
        node {
          id
          serviceId
          startCommand
          domains {
            serviceDomains {
              id
              domain
            }
          }
        }
      }
    }
  }
}
"#;

pub const VARIABLE_COLLECTION_UPSERT: &str = r#"
mutation variableCollectionUpsert($input: VariableCollectionUpsertInput!) {
  variableCollectionUpsert(input: $input)
}
"#;

pub const DEPLOYMENT_TRIGGER_UPDATE: &str = r#"
mutation deploymentTriggerUpdate($id: String!, $input: DeploymentTriggerUpdateInput!) {
  deploymentTriggerUpdate(id: $id, input: $input) {
    id
  }
}
"#;

pub const SERVICE_INSTANCE_REDEPLOY: &str = r#"
mutation serviceInstanceRedeploy($environmentId: String!, $serviceId: String!) {
  serviceInstanceRedeploy(environmentId: $environmentId, serviceId: $serviceId)
}
"#;

pub const SERVICE: &str = r#"
query service($id: String!) {
  service(id: $id) {
    id
    name
  }
}
"#;

pub const ENVIRONMENT_DELETE: &str = r#"
mutation environmentDelete($id: String!) {
  environmentDelete(id: $id)
}
"#;
