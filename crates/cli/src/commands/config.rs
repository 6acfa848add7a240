//! Configuration Commands

use std::path::Path;

use anyhow::Result;
use clap::Subcommand;
use hedvig_provider::ProviderConfig;

use crate::output::print_success;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write the effective configuration to the config file
    Init,

    /// Print the effective configuration
    Show,
}

pub fn execute(cmd: ConfigCommands, config: &ProviderConfig, path: &Path) -> Result<()> {
    match cmd {
        ConfigCommands::Init => {
            config.save(path)?;
            print_success(&format!("Configuration written to {}", path.display()));
        }
        ConfigCommands::Show => {
            let mut shown = config.clone();
            if shown.session_id.is_some() {
                shown.session_id = Some("<redacted>".to_string());
            }
            print!("{}", shown.to_toml()?);
        }
    }
    Ok(())
}
