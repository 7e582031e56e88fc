//! Encode command - JSON hand poses to a .vhs stream

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use vector_hand::{HAND_STREAM_EXT, HandStreamHeader, HandStreamWriter, Layout};

use crate::config::VhandConfig;
use crate::poses::read_poses;

/// Arguments for the encode command
#[derive(Args)]
pub struct EncodeArgs {
    /// Input JSON file (one hand or an array of hands)
    pub input: PathBuf,

    /// Output stream (defaults to the input path with a .vhs extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Record layout, overriding vhand.toml (framed or compact)
    #[arg(short, long)]
    pub layout: Option<Layout>,
}

/// Encode `input` into a stream at `output`
///
/// The whole stream is encoded in memory first; `output` is left untouched on failure.
pub fn encode_file(input: &Path, output: &Path, layout: Layout) -> Result<HandStreamHeader> {
    let poses = read_poses(input)?;

    let mut writer = HandStreamWriter::new(Vec::new(), layout);
    let header = writer
        .write_stream(&poses)
        .with_context(|| format!("Failed to encode {}", input.display()))?;

    std::fs::write(output, writer.into_inner())
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(header)
}

/// Execute the encode command
pub fn execute(args: EncodeArgs, config: &VhandConfig) -> Result<()> {
    let layout = args.layout.unwrap_or(config.codec.layout);
    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension(HAND_STREAM_EXT));

    tracing::info!("Encoding {:?} -> {:?} ({})", args.input, output, layout);
    let header = encode_file(&args.input, &output, layout)?;
    tracing::info!(
        "Encoded {} hands, {} bytes each ({} bytes total)",
        header.hand_count,
        layout.byte_count(),
        header.file_size()
    );
    Ok(())
}
