//! Decode command - .vhs stream to JSON hand poses

use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use vector_hand::{HandPose, HandStreamHeader, HandStreamReader};

use crate::config::VhandConfig;
use crate::poses::write_poses_to;

/// Arguments for the decode command
#[derive(Args)]
pub struct DecodeArgs {
    /// Input .vhs stream
    pub input: PathBuf,

    /// Output JSON file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Read every hand in a stream file
pub fn read_stream_file(path: &Path) -> Result<(HandStreamHeader, Vec<HandPose>)> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    HandStreamReader::new(BufReader::new(file))
        .read_stream()
        .with_context(|| format!("Failed to decode {}", path.display()))
}

/// Execute the decode command
pub fn execute(args: DecodeArgs, config: &VhandConfig) -> Result<()> {
    let (header, poses) = read_stream_file(&args.input)?;
    tracing::debug!("{:?}: {} {} hands", args.input, header.hand_count, header.layout);

    write_poses_to(args.output.as_deref(), &poses, config.output.pretty)?;
    if let Some(path) = &args.output {
        tracing::info!("Decoded {} hands -> {:?}", poses.len(), path);
    }
    Ok(())
}
