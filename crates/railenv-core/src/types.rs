use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PreviewError, PreviewResult};

/// An isolated, named deployment context within a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    /// Platform identifier
    pub id: String,
    /// Human name, unique within the project
    pub name: String,
    /// Creation timestamp, when the platform reports it
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Deployed services of this environment
    #[serde(default)]
    pub service_instances: Vec<ServiceInstance>,
    /// Branch bindings of the environment's build pipelines
    #[serde(default)]
    pub deployment_triggers: Vec<DeploymentTrigger>,
    /// Deployment history, most recent first
    #[serde(default)]
    pub deployments: Vec<Deployment>,
}

impl Environment {
    /// Create an environment with no services, triggers or deployments
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            created_at: None,
            service_instances: Vec::new(),
            deployment_triggers: Vec::new(),
            deployments: Vec::new(),
        }
    }

    /// The deployment the monitor tracks
    pub fn tracked_deployment(&self) -> Option<&Deployment> {
        self.deployments.first()
    }

    /// Identifiers of every deployment trigger
    pub fn trigger_ids(&self) -> Vec<String> {
        self.deployment_triggers.iter().map(|t| t.id.clone()).collect()
    }
}

/// Find an environment by exact name
pub fn find_by_name<'a>(environments: &'a [Environment], name: &str) -> Option<&'a Environment> {
    environments.iter().find(|env| env.name == name)
}

/// The deployed instantiation of a service within an environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstance {
    pub id: String,
    pub service_id: String,
    #[serde(default)]
    pub domains: Vec<ServiceDomain>,
    #[serde(default)]
    pub start_command: Option<String>,
}

impl ServiceInstance {
    pub fn new(id: impl Into<String>, service_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            service_id: service_id.into(),
            domains: Vec::new(),
            start_command: None,
        }
    }

    /// Add a public domain
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domains.push(ServiceDomain {
            id: None,
            domain: domain.into(),
        });
        self
    }

    /// First publicly routable hostname
    pub fn primary_domain(&self) -> Option<&str> {
        self.domains.first().map(|d| d.domain.as_str())
    }
}

/// A publicly routable hostname
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDomain {
    #[serde(default)]
    pub id: Option<String>,
    pub domain: String,
}

/// Binding of a service instance's build pipeline to a branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTrigger {
    pub id: String,
    pub environment_id: String,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
}

impl DeploymentTrigger {
    pub fn new(id: impl Into<String>, environment_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            environment_id: environment_id.into(),
            branch: None,
            provider: None,
            repository: None,
        }
    }
}

/// A single deployment of an environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: String,
    pub status: DeploymentStatus,
}

impl Deployment {
    pub fn new(id: impl Into<String>, status: DeploymentStatus) -> Self {
        Self {
            id: id.into(),
            status,
        }
    }
}

/// Deployment status as reported by the platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeploymentStatus {
    Queued,
    Initializing,
    Waiting,
    Building,
    Deploying,
    Success,
    Failed,
    /// Any value outside the known set, kept verbatim
    Unrecognized(String),
}

impl DeploymentStatus {
    /// Parse the platform's upper-case status string
    pub fn parse(raw: &str) -> Self {
        match raw {
            "QUEUED" => Self::Queued,
            "INITIALIZING" => Self::Initializing,
            "WAITING" => Self::Waiting,
            "BUILDING" => Self::Building,
            "DEPLOYING" => Self::Deploying,
            "SUCCESS" => Self::Success,
            "FAILED" => Self::Failed,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "QUEUED",
            Self::Initializing => "INITIALIZING",
            Self::Waiting => "WAITING",
            Self::Building => "BUILDING",
            Self::Deploying => "DEPLOYING",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Whether polling should stop at this status
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for DeploymentStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<DeploymentStatus> for String {
    fn from(status: DeploymentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Environment variables to upsert into every service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableSet(BTreeMap<String, String>);

impl VariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw JSON object payload.
    ///
    /// Strings are kept as-is, numbers and booleans are stringified. A blank
    /// payload yields an empty set.
    pub fn parse(raw_payload: &str) -> PreviewResult<Self> {
        let trimmed = raw_payload.trim();
        if trimmed.is_empty() {
            return Ok(Self::new());
        }

        let parsed: Value = serde_json::from_str(trimmed)
            .map_err(|e| PreviewError::config(format!("Invalid variables payload: {}", e)))?;
        match parsed {
            Value::Object(object) => Self::from_values(object),
            _ => Err(PreviewError::config(
                "Variables payload must be a JSON object of key/value pairs",
            )),
        }
    }

    /// Build from scalar values, stringifying numbers and booleans
    pub fn from_values<I>(values: I) -> PreviewResult<Self>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut variables = BTreeMap::new();
        for (key, value) in values {
            let value = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(PreviewError::config(format!(
                        "Variable '{}' must be a string, number or boolean, got {}",
                        key, other
                    )))
                }
            };
            variables.insert(key, value);
        }

        Ok(Self(variables))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Request to clone a new environment from a source
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnvironment {
    pub project_id: String,
    pub name: String,
    pub source_environment_id: String,
}

/// New target for a deployment trigger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerUpdate {
    pub branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
}
