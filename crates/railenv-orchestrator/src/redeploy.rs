use std::collections::BTreeSet;

use futures::future::join_all;
use tracing::{info, warn};

use railenv_core::batch::BatchResult;
use railenv_core::client::PlatformClient;
use railenv_core::types::ServiceInstance;

use crate::fanout::fan_out;

/// Service names that identify the primary service when no hint matches,
/// in priority order
pub const FALLBACK_PRIMARY_NAMES: [&str; 3] = ["app", "backend", "web"];

/// The service whose endpoint is published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryService {
    pub service_id: String,
    pub name: String,
    pub domain: Option<String>,
}

#[derive(Debug, Default)]
pub struct RedeployReport {
    /// Redeploy outcome per service id; failed name lookups land here too
    pub redeployed: BatchResult<String>,
    /// Names of services skipped on purpose
    pub excluded: Vec<String>,
    pub primary: Option<PrimaryService>,
}

impl RedeployReport {
    pub fn primary_domain(&self) -> Option<&str> {
        self.primary.as_ref().and_then(|p| p.domain.as_deref())
    }
}

pub struct SelectiveRedeployer<'a, C: ?Sized> {
    client: &'a C,
}

impl<'a, C: PlatformClient + ?Sized> SelectiveRedeployer<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Redeploy every service whose name is not excluded and pick the primary
    /// service.
    ///
    /// A service whose name cannot be resolved is recorded as failed and not
    /// redeployed.
    pub async fn redeploy(
        &self,
        environment_id: &str,
        service_instances: &[ServiceInstance],
        excluded_services: &BTreeSet<String>,
        primary_hint: Option<&str>,
    ) -> RedeployReport {
        let client = self.client;
        let lookups = join_all(service_instances.iter().map(|instance| async move {
            (instance, client.service_name(&instance.service_id).await)
        }))
        .await;

        let mut report = RedeployReport::default();
        let mut named: Vec<(&ServiceInstance, String)> = Vec::with_capacity(lookups.len());
        for (instance, lookup) in lookups {
            match lookup {
                Ok(name) => named.push((instance, name)),
                Err(e) => {
                    warn!(service_id = %instance.service_id, error = %e, "Could not resolve service name, skipping redeploy");
                    report.redeployed.record_failure(instance.service_id.clone(), e);
                }
            }
        }

        report.primary = select_primary(&named, primary_hint);
        match &report.primary {
            Some(primary) => info!(
                service = %primary.name,
                domain = primary.domain.as_deref().unwrap_or("<none>"),
                "Identified primary service"
            ),
            None => info!("No primary service found, no domain will be reported"),
        }

        let mut targets = Vec::new();
        for (instance, name) in &named {
            if excluded_services.contains(name) {
                info!(service = %name, "Service excluded from redeploy");
                report.excluded.push(name.clone());
            } else {
                targets.push(instance.service_id.clone());
            }
        }

        info!(environment_id, services = targets.len(), "Redeploying services");
        let batch = fan_out("redeploy", targets, |service_id| async move {
            client.redeploy_service(environment_id, &service_id).await
        })
        .await;

        report.redeployed.succeeded.extend(batch.succeeded);
        report.redeployed.failed.extend(batch.failed);
        report
    }
}

/// The service named after the hint, else the first fallback name present
pub fn select_primary(named: &[(&ServiceInstance, String)], primary_hint: Option<&str>) -> Option<PrimaryService> {
    let by_name = |wanted: &str| {
        named
            .iter()
            .find(|(_, name)| name == wanted)
            .map(|(instance, name)| PrimaryService {
                service_id: instance.service_id.clone(),
                name: name.clone(),
                domain: instance.primary_domain().map(str::to_string),
            })
    };

    primary_hint
        .and_then(by_name)
        .or_else(|| FALLBACK_PRIMARY_NAMES.iter().find_map(|&fallback| by_name(fallback)))
}
