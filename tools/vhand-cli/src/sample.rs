//! Sample command - emit reference hands as JSON

use anyhow::Result;
use clap::Args;
use glam::{Quat, Vec3};
use std::path::PathBuf;
use vector_hand::HandPose;

use crate::config::VhandConfig;
use crate::poses::write_poses_to;

/// Arguments for the sample command
#[derive(Args)]
pub struct SampleArgs {
    /// Output JSON file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of hands to generate
    #[arg(short, long, default_value_t = 4)]
    pub count: usize,
}

/// Hands alternating right/left, drifting and turning a little each frame
pub fn sample_hands(count: usize) -> Vec<HandPose> {
    (0..count)
        .map(|i| {
            let t = i as f32;
            let is_left = i % 2 == 1;
            let side = if is_left { -0.15 } else { 0.15 };
            HandPose::reference(is_left).transformed(
                Vec3::new(side + 0.01 * t, 1.2, 0.35 - 0.005 * t),
                Quat::from_rotation_y(0.05 * t) * Quat::from_rotation_x(-0.2),
            )
        })
        .collect()
}

/// Execute the sample command
pub fn execute(args: SampleArgs, config: &VhandConfig) -> Result<()> {
    let hands = sample_hands(args.count);
    write_poses_to(args.output.as_deref(), &hands, config.output.pretty)?;
    if let Some(path) = &args.output {
        tracing::info!("Wrote {} sample hands to {}", hands.len(), path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_hands_alternate() {
        let hands = sample_hands(5);
        assert_eq!(hands.len(), 5);
        for (i, hand) in hands.iter().enumerate() {
            assert_eq!(hand.is_left, i % 2 == 1);
            assert_eq!(hand.validate(), Ok(()));
        }
    }
}
