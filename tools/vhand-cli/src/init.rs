//! Init command - write a default vhand.toml

use anyhow::{Context, Result, bail};
use clap::Args;
use std::path::PathBuf;

use crate::config::{CONFIG_FILE_NAME, VhandConfig};

/// Arguments for the init command
#[derive(Args)]
pub struct InitArgs {
    /// Where to write the config (defaults to ./vhand.toml)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Execute the init command
pub fn execute(args: InitArgs) -> Result<PathBuf> {
    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

    if path.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let content = VhandConfig::default().to_toml()?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!("Created {}", path.display());
    Ok(path)
}
