//! Inspect command - summarize a .vhs stream

use anyhow::Result;
use clap::Args;
use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::decode::read_stream_file;

/// Arguments for the inspect command
#[derive(Args)]
pub struct InspectArgs {
    /// Input .vhs stream
    pub input: PathBuf,
}

/// Human-readable summary of a stream file
pub fn summarize(path: &Path) -> Result<String> {
    let (header, poses) = read_stream_file(path)?;

    let mut report = String::new();
    writeln!(report, "{}", path.display())?;
    writeln!(report, "  layout:      {}", header.layout)?;
    writeln!(report, "  record size: {} bytes", header.layout.byte_count())?;
    writeln!(report, "  hands:       {}", header.hand_count)?;
    writeln!(report, "  file size:   {} bytes", header.file_size())?;

    for (i, pose) in poses.iter().enumerate() {
        let p = pose.palm_position;
        writeln!(
            report,
            "  [{:>4}] {:<5} palm ({:+.3}, {:+.3}, {:+.3})",
            i,
            if pose.is_left { "left" } else { "right" },
            p.x,
            p.y,
            p.z
        )?;
    }
    Ok(report)
}

/// Execute the inspect command
pub fn execute(args: InspectArgs) -> Result<()> {
    print!("{}", summarize(&args.input)?);
    Ok(())
}
