use tracing::{debug, info};

use railenv_api::create_client;
use railenv_core::client::PlatformClient;
use railenv_core::config::{PreviewConfig, PreviewSettings};
use railenv_core::error::PreviewResult;
use railenv_orchestrator::{Orchestrator, RunReport};

use crate::output::{format_field, format_success, format_warning, ActionOutput};
use crate::settings;

/// Name of the step output carrying the primary service's domain
pub const SERVICE_DOMAIN_OUTPUT: &str = "service_domain";

/// Execute the provision command
pub async fn execute(settings: &PreviewSettings, output: &ActionOutput) -> PreviewResult<()> {
    let api_config = settings::api_config(settings)?;
    let config = settings.to_config()?;
    debug!(?api_config, "Using API configuration");

    let client = create_client(api_config)?;
    provision_with(client, config, output).await?;
    Ok(())
}

/// Run the orchestrator against `client` and publish its outputs
pub async fn provision_with<C: PlatformClient>(
    client: C,
    config: PreviewConfig,
    output: &ActionOutput,
) -> PreviewResult<RunReport> {
    info!(
        environment = %config.destination,
        branch = %config.branch,
        "Provisioning preview environment"
    );

    let report = Orchestrator::new(client, config).run().await?;

    if let Some(domain) = &report.service_domain {
        output.set_output(SERVICE_DOMAIN_OUTPUT, domain)?;
    }

    print_summary(&report, output);
    Ok(report)
}

fn print_summary(report: &RunReport, output: &ActionOutput) {
    let origin = if report.created { "created" } else { "reused" };
    eprintln!(
        "{}",
        format_success(&format!("environment '{}' {} and deployed", report.environment_name, origin))
    );
    eprintln!("{}", format_field("Environment id", &report.environment_id));
    eprintln!(
        "{}",
        format_field("Domain", report.service_domain.as_deref().unwrap_or("none"))
    );
    if !report.redeploy.excluded.is_empty() {
        eprintln!("{}", format_field("Not redeployed", report.redeploy.excluded.join(", ")));
    }

    for (stage, failed) in [
        ("variable upsert", report.variables.failed_ids()),
        ("trigger update", report.triggers.failed_ids()),
        ("redeploy", report.redeploy.redeployed.failed_ids()),
    ] {
        if !failed.is_empty() {
            let message = format!("{} failed for: {}", stage, failed.join(", "));
            eprintln!("{}", format_warning(&message));
            output.warning(&message);
        }
    }
}
