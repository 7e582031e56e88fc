//! vhand CLI - encode, decode and inspect hand streams
//!
//! # Commands
//!
//! - `vhand init` - Create a default vhand.toml
//! - `vhand sample` - Emit reference hands as JSON
//! - `vhand encode` - JSON hand poses -> .vhs stream
//! - `vhand decode` - .vhs stream -> JSON hand poses
//! - `vhand inspect` - Summarize a .vhs stream
//!
//! # Usage
//!
//! ```bash
//! vhand sample --count 8 -o hands.json
//! vhand encode hands.json --layout compact
//! vhand inspect hands.vhs
//! vhand decode hands.vhs -o roundtrip.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vhand_cli::{config, decode, encode, init, inspect, sample};

/// vhand - encode, decode and inspect hand streams
#[derive(Parser)]
#[command(name = "vhand")]
#[command(about = "Encode, decode and inspect hand streams")]
#[command(version)]
struct Cli {
    /// Path to vhand.toml (defaults to ./vhand.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default vhand.toml
    Init(init::InitArgs),

    /// Emit reference hands as JSON
    Sample(sample::SampleArgs),

    /// Encode JSON hand poses into a .vhs stream
    Encode(encode::EncodeArgs),

    /// Decode a .vhs stream into JSON hand poses
    Decode(decode::DecodeArgs),

    /// Summarize a .vhs stream
    Inspect(inspect::InspectArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let load_config = || -> Result<config::VhandConfig> {
        let working_dir = std::env::current_dir().context("Failed to read current directory")?;
        config::resolve_config(cli.config.as_deref(), &working_dir)
    };

    match cli.command {
        Commands::Init(args) => {
            init::execute(args)?;
            Ok(())
        }
        Commands::Sample(args) => sample::execute(args, &load_config()?),
        Commands::Encode(args) => encode::execute(args, &load_config()?),
        Commands::Decode(args) => decode::execute(args, &load_config()?),
        Commands::Inspect(args) => inspect::execute(args),
    }
}
