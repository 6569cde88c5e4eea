use console::style;
use tracing::debug;

use railenv_api::create_client;
use railenv_core::client::PlatformClient;
use railenv_core::config::PreviewSettings;
use railenv_core::error::PreviewResult;
use railenv_core::types::Environment;

use crate::settings;

/// Execute the list command
pub async fn execute(settings: &PreviewSettings) -> PreviewResult<()> {
    let client = create_client(settings::api_config(settings)?)?;
    let project_id = settings::project_id(settings)?;

    let environments = client.list_environments(project_id).await?;
    debug!(count = environments.len(), "Listed environments");

    println!("Environments in project {}:", project_id);
    for environment in &environments {
        println!("{}", describe(environment));
    }
    Ok(())
}

/// One line per environment: name, id, service count, latest status
pub fn describe(environment: &Environment) -> String {
    let status = environment
        .tracked_deployment()
        .map(|d| d.status.to_string())
        .unwrap_or_else(|| "NO DEPLOYMENT".to_string());

    format!(
        "  {} ({}) services={} status={}",
        style(&environment.name).green(),
        environment.id,
        environment.service_instances.len(),
        style(status).yellow()
    )
}
