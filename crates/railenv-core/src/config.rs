use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PreviewError, PreviewResult};
use crate::types::VariableSet;

/// Default bound on how long the monitor waits for the initial deployment
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(600_000);
/// Default pause between two status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(20_000);
/// Default pause between variable propagation and the first poll
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(10_000);

/// Environment a new preview environment is cloned from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEnvironment {
    /// Platform identifier, used as-is
    Id(String),
    /// Name, looked up among the project's environments
    Name(String),
}

/// Immutable configuration for one provisioning run
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Project owning both environments
    pub project_id: String,
    /// Where a new environment is cloned from; only needed when creating
    pub source: Option<SourceEnvironment>,
    /// Name of the preview environment
    pub destination: String,
    /// Variables upserted into every service
    pub variables: VariableSet,
    /// Branch every deployment trigger is retargeted to
    pub branch: String,
    /// Repository to set on triggers alongside the branch
    pub repository: Option<String>,
    /// Service whose domain is published
    pub primary_service: Option<String>,
    /// Services left out of the final redeploy
    pub excluded_services: BTreeSet<String>,
    /// Fail instead of reusing an existing destination
    pub fail_if_exists: bool,
    /// Bound on the deployment wait
    pub poll_timeout: Duration,
    /// Pause between status polls
    pub poll_interval: Duration,
    /// Pause before the first status poll
    pub settle_delay: Duration,
}

impl PreviewConfig {
    /// Create a configuration with default timings and no variables
    pub fn new(
        project_id: impl Into<String>,
        destination: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            source: None,
            destination: destination.into(),
            variables: VariableSet::new(),
            branch: branch.into(),
            repository: None,
            primary_service: None,
            excluded_services: BTreeSet::new(),
            fail_if_exists: false,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    pub fn with_source(mut self, source: SourceEnvironment) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_variables(mut self, variables: VariableSet) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_excluded_services<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_services = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_primary_service(mut self, name: impl Into<String>) -> Self {
        self.primary_service = Some(name.into());
        self
    }

    pub fn with_fail_if_exists(mut self, fail_if_exists: bool) -> Self {
        self.fail_if_exists = fail_if_exists;
        self
    }

    pub fn with_timings(mut self, poll_timeout: Duration, poll_interval: Duration, settle_delay: Duration) -> Self {
        self.poll_timeout = poll_timeout;
        self.poll_interval = poll_interval;
        self.settle_delay = settle_delay;
        self
    }
}

/// Variables as written in a settings file: a raw JSON payload or a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariablesInput {
    Raw(String),
    Table(BTreeMap<String, serde_json::Value>),
}

/// Service list as written in a settings file: a raw string or an array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServiceListInput {
    Raw(String),
    List(Vec<String>),
}

/// Unvalidated inputs, gathered from the command line, the CI runner and an
/// optional TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewSettings {
    pub token: Option<String>,
    pub endpoint: Option<String>,
    pub project_id: Option<String>,
    pub source_environment_name: Option<String>,
    pub source_environment_id: Option<String>,
    pub destination: Option<String>,
    pub branch: Option<String>,
    pub repository: Option<String>,
    pub variables: Option<VariablesInput>,
    pub primary_service: Option<String>,
    pub excluded_services: Option<ServiceListInput>,
    pub fail_if_exists: Option<bool>,
    pub poll_timeout_ms: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub settle_delay_ms: Option<u64>,
}

impl PreviewSettings {
    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> PreviewResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PreviewError::config(format!("Failed to read settings file {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse settings from a TOML string
    pub fn from_toml(content: &str) -> PreviewResult<Self> {
        toml::from_str(content)
            .map_err(|e| PreviewError::config(format!("Failed to parse settings: {}", e)))
    }

    /// Fill every unset field from `fallback`
    pub fn merge(self, fallback: PreviewSettings) -> Self {
        Self {
            token: self.token.or(fallback.token),
            endpoint: self.endpoint.or(fallback.endpoint),
            project_id: self.project_id.or(fallback.project_id),
            source_environment_name: self.source_environment_name.or(fallback.source_environment_name),
            source_environment_id: self.source_environment_id.or(fallback.source_environment_id),
            destination: self.destination.or(fallback.destination),
            branch: self.branch.or(fallback.branch),
            repository: self.repository.or(fallback.repository),
            variables: self.variables.or(fallback.variables),
            primary_service: self.primary_service.or(fallback.primary_service),
            excluded_services: self.excluded_services.or(fallback.excluded_services),
            fail_if_exists: self.fail_if_exists.or(fallback.fail_if_exists),
            poll_timeout_ms: self.poll_timeout_ms.or(fallback.poll_timeout_ms),
            poll_interval_ms: self.poll_interval_ms.or(fallback.poll_interval_ms),
            settle_delay_ms: self.settle_delay_ms.or(fallback.settle_delay_ms),
        }
    }

    /// Validate into the immutable run configuration
    pub fn to_config(&self) -> PreviewResult<PreviewConfig> {
        let project_id = required(&self.project_id, "project_id")?;
        let destination = required(&self.destination, "destination")?;
        let branch = required(&self.branch, "branch")?;

        // An explicit id wins over a name lookup
        let source = match (
            non_empty(&self.source_environment_id),
            non_empty(&self.source_environment_name),
        ) {
            (Some(id), _) => Some(SourceEnvironment::Id(id)),
            (None, Some(name)) => Some(SourceEnvironment::Name(name)),
            (None, None) => None,
        };

        let variables = match &self.variables {
            None => VariableSet::new(),
            Some(VariablesInput::Raw(raw_payload)) => VariableSet::parse(raw_payload)?,
            Some(VariablesInput::Table(table)) => VariableSet::from_values(table.clone())?,
        };

        let excluded_services = match &self.excluded_services {
            None => BTreeSet::new(),
            Some(ServiceListInput::Raw(raw_list)) => parse_service_list(raw_list)?,
            Some(ServiceListInput::List(names)) => names
                .iter()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect(),
        };

        let poll_timeout = self.poll_timeout_ms.map(Duration::from_millis).unwrap_or(DEFAULT_POLL_TIMEOUT);
        if poll_timeout.is_zero() {
            return Err(PreviewError::config("poll_timeout_ms must be greater than zero"));
        }

        Ok(PreviewConfig {
            project_id,
            source,
            destination,
            variables,
            branch,
            repository: non_empty(&self.repository),
            primary_service: non_empty(&self.primary_service),
            excluded_services,
            fail_if_exists: self.fail_if_exists.unwrap_or(false),
            poll_timeout,
            poll_interval: self.poll_interval_ms.map(Duration::from_millis).unwrap_or(DEFAULT_POLL_INTERVAL),
            settle_delay: self.settle_delay_ms.map(Duration::from_millis).unwrap_or(DEFAULT_SETTLE_DELAY),
        })
    }
}

/// Parse a string-encoded list of service names.
///
/// Accepts a JSON array (`["worker", "cron"]`) or a comma/newline separated
/// list (`worker, cron`).
pub fn parse_service_list(raw_list: &str) -> PreviewResult<BTreeSet<String>> {
    let trimmed = raw_list.trim();
    if trimmed.starts_with('[') {
        let names: Vec<String> = serde_json::from_str(trimmed)
            .map_err(|e| PreviewError::config(format!("Invalid service list: {}", e)))?;
        return Ok(names
            .into_iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect());
    }

    Ok(trimmed
        .split(|c: char| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required(value: &Option<String>, field: &str) -> PreviewResult<String> {
    non_empty(value).ok_or_else(|| PreviewError::config(format!("Missing required input: {}", field)))
}
