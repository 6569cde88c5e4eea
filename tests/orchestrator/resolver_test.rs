use railenv_core::config::{PreviewConfig, SourceEnvironment};
use railenv_core::error::PreviewError;
use railenv_core::types::Environment;
use railenv_orchestrator::EnvironmentResolver;

use crate::support::{config, environment_with_services, FakePlatform};

#[tokio::test]
async fn test_creates_from_named_source() {
    let platform = FakePlatform::new()
        .with_environment(Environment::new("env_staging", "staging"))
        .creating(environment_with_services("env_1", "pr-42", &[("svc_web", None)]));

    let resolution = EnvironmentResolver::new(&platform)
        .resolve(&config("pr-42", "feat-x"))
        .await
        .unwrap();

    assert!(resolution.created);
    assert_eq!(resolution.environment.id, "env_1");

    let creations = platform.creations();
    assert_eq!(creations.len(), 1);
    assert_eq!(creations[0].source_environment_id, "env_staging");
    assert_eq!(creations[0].name, "pr-42");
    assert_eq!(creations[0].project_id, "proj_1");
}

#[tokio::test]
async fn test_source_id_skips_lookup() {
    let platform = FakePlatform::new();
    let config = config("pr-42", "feat-x").with_source(SourceEnvironment::Id("env_raw".into()));

    let resolution = EnvironmentResolver::new(&platform).resolve(&config).await.unwrap();

    assert!(resolution.created);
    assert_eq!(platform.creations()[0].source_environment_id, "env_raw");
}

#[tokio::test]
async fn test_missing_source_fails_before_creation() {
    let platform = FakePlatform::new().with_environment(Environment::new("env_prod", "production"));

    let err = EnvironmentResolver::new(&platform)
        .resolve(&config("pr-42", "feat-x"))
        .await
        .unwrap_err();

    match err {
        PreviewError::SourceEnvironmentNotFound { name } => assert_eq!(name, "staging"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(platform.creations().is_empty());
}

#[tokio::test]
async fn test_no_source_configured_is_a_config_error() {
    let platform = FakePlatform::new();
    let config = PreviewConfig::new("proj_1", "pr-42", "feat-x");

    let err = EnvironmentResolver::new(&platform).resolve(&config).await.unwrap_err();
    assert!(err.is_config());
    assert!(platform.creations().is_empty());
}

#[tokio::test]
async fn test_reuses_existing_environment_unchanged() {
    let existing = environment_with_services(
        "env_9",
        "pr-42",
        &[("svc_web", Some("pr-42.example.app")), ("svc_worker", None)],
    );
    let platform = FakePlatform::new()
        .with_environment(Environment::new("env_staging", "staging"))
        .with_environment(existing.clone());

    let resolution = EnvironmentResolver::new(&platform)
        .resolve(&config("pr-42", "feat-x"))
        .await
        .unwrap();

    assert!(!resolution.created);
    assert_eq!(resolution.environment, existing);
    assert!(platform.creations().is_empty());
    assert_eq!(platform.list_calls(), 1);
}

#[tokio::test]
async fn test_existing_environment_refused() {
    let platform = FakePlatform::new().with_environment(Environment::new("env_9", "pr-42"));
    let config = config("pr-42", "feat-x").with_fail_if_exists(true);

    let err = EnvironmentResolver::new(&platform).resolve(&config).await.unwrap_err();

    assert!(matches!(err, PreviewError::EnvironmentAlreadyExists { ref name } if name == "pr-42"));
    assert!(platform.creations().is_empty());
}

#[tokio::test]
async fn test_duplicate_names_use_the_first() {
    let platform = FakePlatform::new()
        .with_environment(Environment::new("env_a", "pr-42"))
        .with_environment(Environment::new("env_b", "pr-42"));

    let resolution = EnvironmentResolver::new(&platform)
        .resolve(&config("pr-42", "feat-x"))
        .await
        .unwrap();

    assert_eq!(resolution.environment.id, "env_a");
}

#[tokio::test]
async fn test_listing_failure_propagates() {
    let platform = FakePlatform::new().failing_on("proj_1");

    let err = EnvironmentResolver::new(&platform)
        .resolve(&config("pr-42", "feat-x"))
        .await
        .unwrap_err();
    assert!(matches!(err, PreviewError::Transport(_)));
}
