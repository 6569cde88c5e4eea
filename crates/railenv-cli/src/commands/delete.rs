use tracing::info;

use railenv_api::create_client;
use railenv_core::client::PlatformClient;
use railenv_core::config::PreviewSettings;
use railenv_core::error::{PreviewError, PreviewResult};
use railenv_core::types::find_by_name;

use crate::output::format_success;
use crate::settings;

/// Execute the delete command
pub async fn execute(settings: &PreviewSettings, name: &str) -> PreviewResult<()> {
    let client = create_client(settings::api_config(settings)?)?;
    let project_id = settings::project_id(settings)?;

    let environment_id = delete_by_name(&client, project_id, name).await?;
    eprintln!(
        "{}",
        format_success(&format!("deleted environment '{}' ({})", name, environment_id))
    );
    Ok(())
}

/// Delete the environment called `name`, returning its id
pub async fn delete_by_name<C: PlatformClient + ?Sized>(
    client: &C,
    project_id: &str,
    name: &str,
) -> PreviewResult<String> {
    let environments = client.list_environments(project_id).await?;
    let environment = find_by_name(&environments, name).ok_or_else(|| PreviewError::EnvironmentNotFound {
        name: name.to_string(),
    })?;

    info!(environment = %environment.name, environment_id = %environment.id, "Deleting environment");
    client.delete_environment(&environment.id).await?;
    Ok(environment.id.clone())
}
