use std::fs;
use std::time::Duration;

use async_trait::async_trait;
use mockall::mock;
use tempfile::tempdir;

use railenv_cli::commands::delete::delete_by_name;
use railenv_cli::commands::list::describe;
use railenv_cli::commands::provision::provision_with;
use railenv_cli::ActionOutput;
use railenv_core::client::PlatformClient;
use railenv_core::config::PreviewConfig;
use railenv_core::error::{PreviewError, PreviewResult};
use railenv_core::types::{
    CreateEnvironment, Deployment, DeploymentStatus, Environment, ServiceInstance, TriggerUpdate, VariableSet,
};

mock! {
    Platform {}

    #[async_trait]
    impl PlatformClient for Platform {
        async fn list_environments(&self, project_id: &str) -> PreviewResult<Vec<Environment>>;
        async fn create_environment(&self, request: &CreateEnvironment) -> PreviewResult<Environment>;
        async fn upsert_variables(
            &self,
            project_id: &str,
            environment_id: &str,
            service_id: &str,
            variables: &VariableSet,
        ) -> PreviewResult<()>;
        async fn update_deployment_trigger(&self, trigger_id: &str, update: &TriggerUpdate) -> PreviewResult<()>;
        async fn redeploy_service(&self, environment_id: &str, service_id: &str) -> PreviewResult<()>;
        async fn service_name(&self, service_id: &str) -> PreviewResult<String>;
        async fn delete_environment(&self, environment_id: &str) -> PreviewResult<()>;
    }
}

fn deployed_preview() -> Environment {
    let mut environment = Environment::new("env_1", "pr-42");
    environment
        .service_instances
        .push(ServiceInstance::new("si_1", "svc_web").with_domain("pr-42.example.app"));
    environment
        .deployments
        .push(Deployment::new("dep_1", DeploymentStatus::Success));
    environment
}

#[tokio::test]
async fn test_provision_publishes_service_domain() {
    let mut platform = MockPlatform::new();
    platform
        .expect_list_environments()
        .returning(|_| Ok(vec![deployed_preview()]));
    platform.expect_create_environment().never();
    platform.expect_upsert_variables().times(1).returning(|_, _, _, _| Ok(()));
    platform.expect_service_name().returning(|_| Ok("web".to_string()));
    platform.expect_redeploy_service().times(1).returning(|_, _| Ok(()));

    let dir = tempdir().unwrap();
    let path = dir.path().join("github_output");
    let output = ActionOutput::new(Some(path.clone()));
    let config = PreviewConfig::new("proj_1", "pr-42", "feat-x").with_timings(
        Duration::from_millis(60_000),
        Duration::from_millis(1_000),
        Duration::ZERO,
    );

    let report = provision_with(platform, config, &output).await.unwrap();

    assert!(!report.created);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "service_domain=pr-42.example.app\n"
    );
}

#[tokio::test]
async fn test_provision_without_primary_writes_nothing() {
    let mut platform = MockPlatform::new();
    platform
        .expect_list_environments()
        .returning(|_| Ok(vec![deployed_preview()]));
    platform.expect_upsert_variables().returning(|_, _, _, _| Ok(()));
    platform.expect_service_name().returning(|_| Ok("worker".to_string()));
    platform.expect_redeploy_service().returning(|_, _| Ok(()));

    let dir = tempdir().unwrap();
    let path = dir.path().join("github_output");
    let output = ActionOutput::new(Some(path.clone()));
    let config = PreviewConfig::new("proj_1", "pr-42", "feat-x").with_timings(
        Duration::from_millis(60_000),
        Duration::from_millis(1_000),
        Duration::ZERO,
    );

    let report = provision_with(platform, config, &output).await.unwrap();

    assert!(report.service_domain.is_none());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_delete_by_name() {
    let mut platform = MockPlatform::new();
    platform
        .expect_list_environments()
        .returning(|_| Ok(vec![Environment::new("env_staging", "staging"), deployed_preview()]));
    platform
        .expect_delete_environment()
        .withf(|environment_id| environment_id == "env_1")
        .times(1)
        .returning(|_| Ok(()));

    let deleted = delete_by_name(&platform, "proj_1", "pr-42").await.unwrap();
    assert_eq!(deleted, "env_1");
}

#[tokio::test]
async fn test_delete_unknown_environment() {
    let mut platform = MockPlatform::new();
    platform
        .expect_list_environments()
        .returning(|_| Ok(vec![Environment::new("env_staging", "staging")]));
    platform.expect_delete_environment().never();

    let err = delete_by_name(&platform, "proj_1", "pr-42").await.unwrap_err();
    assert!(matches!(err, PreviewError::EnvironmentNotFound { ref name } if name == "pr-42"));
}

#[test]
fn test_describe_environment() {
    console::set_colors_enabled(false);

    let line = describe(&deployed_preview());
    assert!(line.contains("pr-42"));
    assert!(line.contains("env_1"));
    assert!(line.contains("services=1"));
    assert!(line.contains("SUCCESS"));

    let bare = describe(&Environment::new("env_2", "pr-7"));
    assert!(bare.contains("NO DEPLOYMENT"));
}
