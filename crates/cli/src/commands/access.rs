//! Access Commands

use anyhow::{bail, Result};
use clap::Args;
use hedvig_provider::provider::{Diagnostic, Severity};
use hedvig_provider::resources::access::state_from_value;
use hedvig_provider::state::{make_state, string_value};
use hedvig_provider::HedvigProvider;
use tracing::info;

use crate::output::{print_error, print_info, print_item, print_success, print_warning, OutputFormat};
use crate::state_file::StateFile;

const ACCESS: &str = "hedvig_access";

#[derive(Args)]
pub struct GrantArgs {
    /// Virtual disk name
    #[arg(long)]
    pub vdisk: String,

    /// Host to export the disk to
    #[arg(long)]
    pub host: String,

    /// Initiator network address
    #[arg(long)]
    pub address: String,

    /// Access type as understood by the cluster
    #[arg(long = "type")]
    pub access_type: String,
}

/// Grant the binding, replacing the recorded one when present
pub async fn grant(
    args: GrantArgs,
    provider: &HedvigProvider,
    state: &StateFile,
    format: OutputFormat,
) -> Result<()> {
    let planned = make_state(vec![
        ("vdisk", string_value(args.vdisk)),
        ("host", string_value(args.host)),
        ("address", string_value(args.address)),
        ("type", string_value(args.access_type)),
    ]);

    let diagnostics = provider.validate_resource_config(ACCESS, &planned);
    check(&diagnostics)?;

    let prior = state.load()?;
    if prior.is_some() {
        info!("Updating recorded binding");
    }

    let response = provider
        .apply_resource_change(ACCESS, prior.as_ref(), Some(&planned))
        .await?;
    // Recorded even on failure: a failed replacement leaves no binding behind
    state.store(response.new_state.as_ref())?;
    check(&response.diagnostics)?;

    match response.new_state {
        Some(new_state) => {
            print_success("Access granted");
            print_item(&state_from_value(&new_state)?, format);
        }
        None => print_warning("Virtual disk disappeared after granting access"),
    }
    Ok(())
}

/// Re-read the recorded binding from the cluster
pub async fn refresh(provider: &HedvigProvider, state: &StateFile, format: OutputFormat) -> Result<()> {
    let Some(current) = state.load()? else {
        print_info("No binding recorded");
        return Ok(());
    };

    let response = provider.read_resource(ACCESS, &current).await?;
    check(&response.diagnostics)?;
    state.store(response.new_state.as_ref())?;

    match response.new_state {
        Some(new_state) => print_item(&state_from_value(&new_state)?, format),
        None => print_warning("Virtual disk no longer exists; binding removed from state"),
    }
    Ok(())
}

/// Revoke the recorded binding
pub async fn revoke(provider: &HedvigProvider, state: &StateFile) -> Result<()> {
    let Some(current) = state.load()? else {
        print_info("No binding recorded");
        return Ok(());
    };

    let response = provider
        .apply_resource_change(ACCESS, Some(&current), None)
        .await?;
    check(&response.diagnostics)?;
    state.remove()?;

    print_success(&format!("Access {} revoked", state_from_value(&current)?.id));
    Ok(())
}

/// Print the recorded binding without contacting the cluster
pub fn show(state: &StateFile, format: OutputFormat) -> Result<()> {
    match state.load()? {
        Some(current) => print_item(&state_from_value(&current)?, format),
        None => print_info("No binding recorded"),
    }
    Ok(())
}

fn check(diagnostics: &[Diagnostic]) -> Result<()> {
    let mut failed = false;
    for d in diagnostics {
        match d.severity {
            Severity::Error => {
                failed = true;
                print_error(&format!("{}: {}", d.summary, d.detail));
            }
            Severity::Warning => print_warning(&format!("{}: {}", d.summary, d.detail)),
        }
    }
    if failed {
        bail!("operation failed");
    }
    Ok(())
}
