//! Hedvig CLI - Main Entry Point
//!
//! Grants, refreshes and revokes virtual disk access on a Hedvig cluster,
//! keeping the last known binding in a local state file.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hedvig_common::RequestFormat;
use hedvig_provider::config::DEFAULT_CONFIG_FILE;
use hedvig_provider::{HedvigClient, HedvigProvider, ProviderConfig};

mod commands;
mod output;
mod state_file;

use commands::{access, config};
use state_file::{StateFile, DEFAULT_STATE_FILE};

/// Hedvig CLI - virtual disk access management
#[derive(Parser)]
#[command(name = "hedvig")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file
    #[arg(long, env = "HEDVIG_CONFIG", default_value = DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Cluster node serving the management API (overrides the config file)
    #[arg(long, env = "HEDVIG_NODE", global = true)]
    node: Option<String>,

    /// Management API session id (overrides the config file)
    #[arg(long, env = "HEDVIG_SESSION_ID", hide_env_values = true, global = true)]
    session_id: Option<String>,

    /// Request encoding: legacy or json (overrides the config file)
    #[arg(long, global = true)]
    request_format: Option<RequestFormat>,

    /// State file recording the managed binding
    #[arg(long, default_value = DEFAULT_STATE_FILE, global = true)]
    state: PathBuf,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grant access, replacing the recorded binding if any
    Grant(access::GrantArgs),

    /// Reconcile the recorded binding with the cluster
    Refresh,

    /// Revoke the recorded binding
    Revoke,

    /// Show the recorded binding
    Show,

    /// Manage the configuration file
    #[command(subcommand)]
    Config(config::ConfigCommands),

    /// Show version information
    Version,
}

impl Cli {
    /// Config file values with command line and environment overrides applied
    fn provider_config(&self) -> anyhow::Result<ProviderConfig> {
        let mut config = ProviderConfig::load(&self.config)?;
        if let Some(node) = &self.node {
            config.node = node.clone();
        }
        if let Some(session_id) = &self.session_id {
            config.session_id = Some(session_id.clone());
        }
        if let Some(format) = self.request_format {
            config.request_format = format;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let provider_config = cli.provider_config()?;
    let state = StateFile::new(&cli.state);

    let provider = || -> anyhow::Result<HedvigProvider> {
        let client = HedvigClient::from_config(&provider_config)?;
        Ok(HedvigProvider::with_client(client))
    };

    match cli.command {
        Commands::Grant(args) => access::grant(args, &provider()?, &state, cli.format).await?,
        Commands::Refresh => access::refresh(&provider()?, &state, cli.format).await?,
        Commands::Revoke => access::revoke(&provider()?, &state).await?,
        Commands::Show => access::show(&state, cli.format)?,
        Commands::Config(cmd) => config::execute(cmd, &provider_config, &cli.config)?,
        Commands::Version => {
            println!("Hedvig CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Virtual disk access management for Hedvig clusters");
        }
    }

    Ok(())
}
