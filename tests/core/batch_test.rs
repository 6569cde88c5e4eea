use railenv_core::batch::BatchResult;
use railenv_core::error::PreviewError;

#[test]
fn test_partial_batch() {
    let mut batch = BatchResult::new();
    batch.record_success("svc_1".to_string());
    batch.record_failure("svc_2", PreviewError::transport("timeout"));
    batch.record_success("svc_3".to_string());

    assert_eq!(batch.attempted(), 3);
    assert!(!batch.is_complete());
    assert_eq!(batch.failed_ids(), vec!["svc_2"]);
}

#[test]
fn test_empty_batch_is_complete() {
    let batch: BatchResult<String> = BatchResult::default();
    assert!(batch.is_complete());
    assert_eq!(batch.attempted(), 0);
}
