use std::time::Duration;

use tokio::time::Instant;

use railenv_core::types::VariableSet;
use railenv_orchestrator::ConfigPropagator;

use crate::support::{environment_with_services, FakePlatform};

fn variables() -> VariableSet {
    VariableSet::parse(r#"{"A": "1"}"#).unwrap()
}

#[tokio::test]
async fn test_one_upsert_per_service() {
    for count in [0usize, 1, 5] {
        let ids: Vec<String> = (0..count).map(|i| format!("svc_{}", i)).collect();
        let services: Vec<(&str, Option<&str>)> = ids.iter().map(|id| (id.as_str(), None)).collect();
        let environment = environment_with_services("env_1", "pr-42", &services);
        let platform = FakePlatform::new();

        let batch = ConfigPropagator::new(&platform, "proj_1")
            .propagate(&environment.id, &environment.service_instances, &variables())
            .await;

        assert_eq!(batch.attempted(), count);
        assert!(batch.is_complete());

        let mut upserted: Vec<String> = platform.upserts().into_iter().map(|(id, _)| id).collect();
        upserted.sort();
        assert_eq!(upserted, ids);
    }
}

#[tokio::test]
async fn test_same_variables_for_every_service() {
    let environment = environment_with_services("env_1", "pr-42", &[("svc_web", None), ("svc_api", None)]);
    let platform = FakePlatform::new();

    ConfigPropagator::new(&platform, "proj_1")
        .propagate(&environment.id, &environment.service_instances, &variables())
        .await;

    for (_, sent) in platform.upserts() {
        assert_eq!(sent, variables());
    }
}

#[tokio::test]
async fn test_member_failure_is_recorded_not_raised() {
    let environment = environment_with_services(
        "env_1",
        "pr-42",
        &[("svc_web", None), ("svc_api", None), ("svc_worker", None)],
    );
    let platform = FakePlatform::new().failing_on("svc_api");

    let batch = ConfigPropagator::new(&platform, "proj_1")
        .propagate(&environment.id, &environment.service_instances, &variables())
        .await;

    assert_eq!(batch.failed_ids(), vec!["svc_api"]);
    assert_eq!(batch.succeeded.len(), 2);
    assert_eq!(platform.upserts().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_upserts_are_issued_concurrently() {
    let latency = Duration::from_secs(10);
    let environment = environment_with_services(
        "env_1",
        "pr-42",
        &[("svc_web", None), ("svc_api", None), ("svc_worker", None), ("svc_cron", None)],
    );
    let platform = FakePlatform::new().with_latency(latency);

    let started = Instant::now();
    let batch = ConfigPropagator::new(&platform, "proj_1")
        .propagate(&environment.id, &environment.service_instances, &variables())
        .await;

    assert_eq!(batch.succeeded.len(), 4);
    assert!(started.elapsed() < latency * 2);
}
