use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use railenv_api::{create_client, ApiConfig, RailwayClient};
use railenv_core::client::PlatformClient;
use railenv_core::error::PreviewError;
use railenv_core::types::{CreateEnvironment, DeploymentStatus, TriggerUpdate, VariableSet};

async fn client_for(server: &MockServer) -> RailwayClient {
    let config = ApiConfig::new("test-token")
        .with_endpoint(&format!("{}/graphql", server.uri()))
        .unwrap();
    RailwayClient::new(config).unwrap()
}

fn environments_payload() -> serde_json::Value {
    json!({
        "data": {
            "environments": {
                "edges": [
                    {
                        "node": {
                            "id": "env_1",
                            "name": "staging",
                            "createdAt": "2024-03-01T12:00:00Z",
                            "serviceInstances": {
                                "edges": [
                                    {
                                        "node": {
                                            "id": "si_1",
                                            "serviceId": "svc_web",
                                            "startCommand": null,
                                            "domains": {
                                                "serviceDomains": [
                                                    { "id": "dom_1", "domain": "staging.example.app" }
                                                ]
                                            }
                                        }
                                    }
                                ]
                            },
                            "deploymentTriggers": {
                                "edges": [
                                    {
                                        "node": {
                                            "id": "trg_1",
                                            "environmentId": "env_1",
                                            "branch": "main",
                                            "provider": "github",
                                            "repository": "acme/shop"
                                        }
                                    }
                                ]
                            },
                            "deployments": {
                                "edges": [ { "node": { "id": "dep_1", "status": "SUCCESS" } } ]
                            }
                        }
                    },
                    { "node": { "id": "env_2", "name": "pr-7" } }
                ]
            }
        }
    })
}

#[tokio::test]
async fn test_list_environments_flattens_edges() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({ "variables": { "projectId": "proj_1" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(environments_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let environments = client.list_environments("proj_1").await.unwrap();

    assert_eq!(environments.len(), 2);
    let staging = &environments[0];
    assert_eq!(staging.name, "staging");
    assert!(staging.created_at.is_some());
    assert_eq!(staging.service_instances[0].service_id, "svc_web");
    assert_eq!(staging.service_instances[0].primary_domain(), Some("staging.example.app"));
    assert_eq!(staging.trigger_ids(), vec!["trg_1".to_string()]);
    assert_eq!(staging.tracked_deployment().unwrap().status, DeploymentStatus::Success);

    let bare = &environments[1];
    assert!(bare.service_instances.is_empty());
    assert!(bare.tracked_deployment().is_none());
}

#[tokio::test]
async fn test_create_environment_sends_input() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("environmentCreate"))
        .and(body_partial_json(json!({
            "variables": {
                "input": {
                    "projectId": "proj_1",
                    "name": "pr-42",
                    "sourceEnvironmentId": "env_1"
                }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "environmentCreate": {
                    "id": "env_new",
                    "deploymentTriggers": { "edges": [] },
                    "serviceInstances": { "edges": [] }
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let environment = client
        .create_environment(&CreateEnvironment {
            project_id: "proj_1".into(),
            name: "pr-42".into(),
            source_environment_id: "env_1".into(),
        })
        .await
        .unwrap();

    assert_eq!(environment.id, "env_new");
    // Name falls back to the requested one when not echoed
    assert_eq!(environment.name, "pr-42");
}

#[tokio::test]
async fn test_upsert_variables_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "variables": {
                "input": {
                    "projectId": "proj_1",
                    "environmentId": "env_1",
                    "serviceId": "svc_web",
                    "variables": { "API_URL": "https://api.example.app" }
                }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "variableCollectionUpsert": true }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let variables: VariableSet = [("API_URL", "https://api.example.app")].into_iter().collect();
    client
        .upsert_variables("proj_1", "env_1", "svc_web", &variables)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_trigger_update_omits_missing_repository() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "variables": { "id": "trg_1", "input": { "branch": "feat-x" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "deploymentTriggerUpdate": { "id": "trg_1" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let update = TriggerUpdate {
        branch: "feat-x".into(),
        repository: None,
    };
    client.update_deployment_trigger("trg_1", &update).await.unwrap();

    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert!(body["variables"]["input"].get("repository").is_none());
}

#[tokio::test]
async fn test_service_name_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "variables": { "id": "svc_web" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "service": { "id": "svc_web", "name": "web" } }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert_eq!(client.service_name("svc_web").await.unwrap(), "web");
}

#[tokio::test]
async fn test_graphql_errors_become_transport_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [ { "message": "Problem processing request" }, { "message": "try again" } ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.redeploy_service("env_1", "svc_web").await.unwrap_err();
    match err {
        PreviewError::Transport(message) => {
            assert!(message.contains("Problem processing request"));
            assert!(message.contains("try again"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_rejected_mutation_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "serviceInstanceRedeploy": false }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert!(client.redeploy_service("env_1", "svc_web").await.is_err());
}

#[tokio::test]
async fn test_unauthorized_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Not Authorized"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.list_environments("proj_1").await.unwrap_err();
    assert!(matches!(err, PreviewError::Unauthorized(_)));
}

#[tokio::test]
async fn test_server_error_is_transport() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.delete_environment("env_1").await.unwrap_err();
    assert!(matches!(err, PreviewError::Transport(_)));
}

#[tokio::test]
async fn test_shared_client_implements_platform_client() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "environmentDelete": true }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ApiConfig::new("test-token")
        .with_endpoint(&format!("{}/graphql", server.uri()))
        .unwrap();
    let client = create_client(config).unwrap();
    client.delete_environment("env_1").await.unwrap();
}
