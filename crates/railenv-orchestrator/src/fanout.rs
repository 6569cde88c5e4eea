use std::future::Future;

use futures::future::join_all;
use tracing::{debug, warn};

use railenv_core::batch::BatchResult;
use railenv_core::error::PreviewResult;

/// Run `op` for every id concurrently and collect per-id outcomes.
///
/// Member failures are logged and recorded; they never cut the batch short.
pub(crate) async fn fan_out<F, Fut>(stage: &'static str, ids: Vec<String>, op: F) -> BatchResult<String>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = PreviewResult<()>>,
{
    debug!(stage, count = ids.len(), "Starting fan-out");

    let pending = ids.into_iter().map(|id| {
        let call = op(id.clone());
        async move { (id, call.await) }
    });

    let mut batch = BatchResult::new();
    for (id, outcome) in join_all(pending).await {
        match outcome {
            Ok(()) => batch.record_success(id),
            Err(e) => {
                warn!(stage, id = %id, error = %e, "Batch member failed, continuing");
                batch.record_failure(id, e);
            }
        }
    }

    batch
}
