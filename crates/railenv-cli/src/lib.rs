//! Command-line interface for railenv.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::error;

use railenv_core::error::PreviewError;
use railenv_core::logging::{init_logging, LogFormat, LogLevel};

pub mod commands;
pub mod output;
pub mod settings;

pub use output::ActionOutput;

/// CLI arguments parser
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (TOML); flags and CI inputs take precedence over it
    #[arg(short, long, value_name = "FILE", global = true, env = "RAILENV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, value_name = "FORMAT", global = true, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Access to the platform, shared by every command
#[derive(Debug, Clone, Default, Args)]
pub struct ConnectionArgs {
    /// Railway API token
    #[arg(long, global = true, env = "RAILWAY_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Railway project id
    #[arg(long, global = true, env = "INPUT_PROJECT_ID")]
    pub project_id: Option<String>,

    /// GraphQL endpoint
    #[arg(long, global = true, env = "RAILWAY_API_ENDPOINT")]
    pub endpoint: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create or reuse a preview environment, deploy it and publish its domain
    Provision(ProvisionArgs),

    /// List the project's environments with their latest deployment status
    List,

    /// Delete an environment by name
    Delete {
        /// Environment name
        #[arg(long)]
        name: String,
    },
}

/// Inputs of a provisioning run. Each one can also come from the matching
/// GitHub Actions `INPUT_*` variable.
#[derive(Debug, Clone, Default, Args)]
pub struct ProvisionArgs {
    /// Name of the environment to clone from
    #[arg(long, env = "INPUT_SRC_ENVIRONMENT_NAME")]
    pub source_environment_name: Option<String>,

    /// Id of the environment to clone from; wins over the name
    #[arg(long, env = "INPUT_SRC_ENVIRONMENT_ID")]
    pub source_environment_id: Option<String>,

    /// Name of the preview environment
    #[arg(long, env = "INPUT_DEST_ENV_NAME")]
    pub destination: Option<String>,

    /// Branch every deployment trigger builds from
    #[arg(long, env = "INPUT_BRANCH_NAME")]
    pub branch: Option<String>,

    /// Repository to set on deployment triggers
    #[arg(long, env = "INPUT_REPOSITORY")]
    pub repository: Option<String>,

    /// Variables to upsert into every service, as a JSON object
    #[arg(long, value_name = "JSON", env = "INPUT_ENV_VARS")]
    pub variables: Option<String>,

    /// Service whose domain is published
    #[arg(long, env = "INPUT_PRIMARY_SERVICE")]
    pub primary_service: Option<String>,

    /// Services not to redeploy, as a JSON array or comma separated list
    #[arg(long, env = "INPUT_EXCLUDED_SERVICES")]
    pub excluded_services: Option<String>,

    /// Fail when the preview environment already exists instead of reusing it
    #[arg(long, env = "INPUT_FAIL_IF_EXISTS", num_args = 0..=1, default_missing_value = "true")]
    pub fail_if_exists: Option<String>,

    /// Maximum time to wait for the initial deployment, in milliseconds
    #[arg(long, env = "INPUT_TIMEOUT")]
    pub poll_timeout_ms: Option<String>,

    /// Pause between deployment status polls, in milliseconds
    #[arg(long, env = "INPUT_POLL_INTERVAL")]
    pub poll_interval_ms: Option<String>,

    /// Pause between variable propagation and the first poll, in milliseconds
    #[arg(long, env = "INPUT_SETTLE_DELAY")]
    pub settle_delay_ms: Option<String>,
}

/// Run the CLI application
pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { LogLevel::Debug } else { LogLevel::Info };
    init_logging(level, cli.log_format);

    let output = ActionOutput::from_env();
    match execute(cli, &output).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            output.error(&format!("{:#}", e));
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Dispatch a parsed command line
pub async fn execute(cli: Cli, output: &ActionOutput) -> Result<()> {
    let file_settings = match &cli.config {
        Some(path) => Some(railenv_core::PreviewSettings::from_file(path)?),
        None => None,
    };

    match cli.command {
        Commands::Provision(args) => {
            let settings = settings::assemble(&cli.connection, Some(&args), file_settings)?;
            commands::execute_provision(&settings, output).await?;
        }
        Commands::List => {
            let settings = settings::assemble(&cli.connection, None, file_settings)?;
            commands::execute_list(&settings).await?;
        }
        Commands::Delete { name } => {
            let settings = settings::assemble(&cli.connection, None, file_settings)?;
            commands::execute_delete(&settings, &name).await?;
        }
    }

    Ok(())
}

/// Process exit status for a failed run: 2 for bad inputs, 1 otherwise
pub fn exit_code(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<PreviewError>() {
        Some(e) if e.is_config() => 2,
        _ => 1,
    }
}
