use tracing::info;

use railenv_core::batch::BatchResult;
use railenv_core::client::PlatformClient;
use railenv_core::types::TriggerUpdate;

use crate::fanout::fan_out;

/// Retargets deployment triggers to a single branch
pub struct TriggerUpdater<'a, C: ?Sized> {
    client: &'a C,
}

impl<'a, C: PlatformClient + ?Sized> TriggerUpdater<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    pub async fn retarget(&self, trigger_ids: &[String], update: &TriggerUpdate) -> BatchResult<String> {
        info!(
            triggers = trigger_ids.len(),
            branch = %update.branch,
            "Retargeting deployment triggers"
        );

        let client = self.client;
        fan_out("triggers", trigger_ids.to_vec(), |trigger_id| async move {
            client.update_deployment_trigger(&trigger_id, update).await
        })
        .await
    }
}
