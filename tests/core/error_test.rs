use std::time::Duration;

use railenv_core::error::PreviewError;

#[test]
fn test_error_helpers() {
    assert!(matches!(PreviewError::transport("reset"), PreviewError::Transport(_)));
    assert!(matches!(PreviewError::unauthorized("401"), PreviewError::Unauthorized(_)));
    assert!(PreviewError::config("missing").is_config());
    assert!(!PreviewError::serialization("bad").is_config());
}

#[test]
fn test_messages_name_the_environment() {
    let exists = PreviewError::EnvironmentAlreadyExists { name: "pr-42".into() };
    assert!(exists.to_string().contains("pr-42"));

    let timeout = PreviewError::MonitorTimeout {
        environment: "pr-42".into(),
        elapsed: Duration::from_millis(620_000),
        timeout: Duration::from_millis(600_000),
    };
    let message = timeout.to_string();
    assert!(message.contains("620000ms"));
    assert!(message.contains("600000ms"));
}

#[test]
fn test_unrecognized_status_carries_payload() {
    let err = PreviewError::UnrecognizedDeploymentStatus {
        environment: "pr-42".into(),
        status: "WEIRD_STATE".into(),
        raw: r#"{"id":"env_1"}"#.into(),
    };
    let message = err.to_string();
    assert!(message.contains("WEIRD_STATE"));
    assert!(message.contains("env_1"));
}

#[test]
fn test_json_errors_convert() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: PreviewError = json_err.into();
    assert!(matches!(err, PreviewError::Serialization(_)));
}
