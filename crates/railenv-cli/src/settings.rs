//! Assemble run settings from flags, CI inputs and the settings file.

use railenv_api::ApiConfig;
use railenv_core::config::{PreviewSettings, ServiceListInput, VariablesInput};
use railenv_core::error::{PreviewError, PreviewResult};

use crate::{ConnectionArgs, ProvisionArgs};

/// GitHub Actions exposes an action's `RAILWAY_API_TOKEN` input under this name
const TOKEN_INPUT_VAR: &str = "INPUT_RAILWAY_API_TOKEN";

/// Merge command line values over the settings file.
///
/// Blank values are treated as absent, since CI runners pass unset inputs
/// as empty strings.
pub fn assemble(
    connection: &ConnectionArgs,
    provision: Option<&ProvisionArgs>,
    file_settings: Option<PreviewSettings>,
) -> PreviewResult<PreviewSettings> {
    let token = present(&connection.token).or_else(|| {
        std::env::var(TOKEN_INPUT_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
    });

    let mut from_args = PreviewSettings {
        token,
        endpoint: present(&connection.endpoint),
        project_id: present(&connection.project_id),
        ..Default::default()
    };

    if let Some(args) = provision {
        from_args.source_environment_name = present(&args.source_environment_name);
        from_args.source_environment_id = present(&args.source_environment_id);
        from_args.destination = present(&args.destination);
        from_args.branch = present(&args.branch);
        from_args.repository = present(&args.repository);
        from_args.variables = present(&args.variables).map(VariablesInput::Raw);
        from_args.primary_service = present(&args.primary_service);
        from_args.excluded_services = present(&args.excluded_services).map(ServiceListInput::Raw);
        from_args.fail_if_exists = present(&args.fail_if_exists)
            .map(|raw| parse_flag("fail_if_exists", &raw))
            .transpose()?;
        from_args.poll_timeout_ms = present(&args.poll_timeout_ms)
            .map(|raw| parse_millis("poll_timeout_ms", &raw))
            .transpose()?;
        from_args.poll_interval_ms = present(&args.poll_interval_ms)
            .map(|raw| parse_millis("poll_interval_ms", &raw))
            .transpose()?;
        from_args.settle_delay_ms = present(&args.settle_delay_ms)
            .map(|raw| parse_millis("settle_delay_ms", &raw))
            .transpose()?;
    }

    Ok(match file_settings {
        Some(file) => from_args.merge(file),
        None => from_args,
    })
}

/// Client configuration; the token is mandatory
pub fn api_config(settings: &PreviewSettings) -> PreviewResult<ApiConfig> {
    let token = settings
        .token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| PreviewError::config("Missing required input: token (set RAILWAY_API_TOKEN)"))?;

    let config = ApiConfig::new(token);
    match settings.endpoint.as_deref() {
        Some(endpoint) => Ok(config.with_endpoint(endpoint)?),
        None => Ok(config),
    }
}

/// Project id, required by every command
pub fn project_id(settings: &PreviewSettings) -> PreviewResult<&str> {
    settings
        .project_id
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| PreviewError::config("Missing required input: project_id"))
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse a boolean input the way CI systems spell it
pub fn parse_flag(field: &str, raw: &str) -> PreviewResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(PreviewError::config(format!(
            "Invalid value '{}' for {}, expected true or false",
            other, field
        ))),
    }
}

fn parse_millis(field: &str, raw: &str) -> PreviewResult<u64> {
    raw.trim().parse::<u64>().map_err(|_| {
        PreviewError::config(format!(
            "Invalid value '{}' for {}, expected a number of milliseconds",
            raw, field
        ))
    })
}
