//! JSON pose files
//!
//! A pose file holds either a single hand object or an array of them.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use vector_hand::HandPose;

#[derive(Deserialize)]
#[serde(untagged)]
enum PoseFile {
    Many(Vec<HandPose>),
    One(Box<HandPose>),
}

/// Read a pose file
///
/// Bone centers are recomputed from the joints, so files may omit them.
pub fn read_poses(path: &Path) -> Result<Vec<HandPose>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let parsed: PoseFile = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse hand poses from {}", path.display()))?;

    let mut poses = match parsed {
        PoseFile::Many(poses) => poses,
        PoseFile::One(pose) => vec![*pose],
    };
    poses.iter_mut().for_each(HandPose::refresh_centers);
    Ok(poses)
}

/// Serialize poses as a JSON array
pub fn write_poses<W: Write>(writer: W, poses: &[HandPose], pretty: bool) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, poses)?;
    } else {
        serde_json::to_writer(&mut writer, poses)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write poses to `output`, or stdout when `None`
pub fn write_poses_to(output: Option<&Path>, poses: &[HandPose], pretty: bool) -> Result<()> {
    match output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
            write_poses(file, poses, pretty)
        }
        None => write_poses(std::io::stdout().lock(), poses, pretty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_reads_single_and_array() {
        let dir = tempfile::tempdir().unwrap();
        let pose = HandPose::reference(true);

        let single = dir.path().join("one.json");
        std::fs::write(&single, serde_json::to_string(&pose).unwrap()).unwrap();
        let read = read_poses(&single).unwrap();
        assert_eq!(read.len(), 1);
        assert!(read[0].is_left);
        assert_eq!(read[0].validate(), Ok(()));

        let array = dir.path().join("many.json");
        let mut out = Vec::new();
        write_poses(&mut out, &[pose.clone(), pose.clone()], false).unwrap();
        std::fs::write(&array, out).unwrap();
        assert_eq!(read_poses(&array).unwrap().len(), 2);
    }

    #[test]
    fn test_missing_centers_are_derived() {
        let dir = tempfile::tempdir().unwrap();
        let pose = HandPose::reference(false);

        let mut json = serde_json::to_value(&pose).unwrap();
        for finger in json["fingers"].as_array_mut().unwrap() {
            for bone in finger["bones"].as_array_mut().unwrap() {
                bone.as_object_mut().unwrap().remove("center");
            }
        }
        let path = dir.path().join("joints.json");
        std::fs::write(&path, json.to_string()).unwrap();

        let read = read_poses(&path).unwrap();
        for bone in read[0].fingers.iter().flat_map(|f| &f.bones) {
            let midpoint = (bone.prev_joint + bone.next_joint) * 0.5;
            assert!(bone.center.distance(midpoint) < 1e-6);
            assert_ne!(bone.center, Vec3::ZERO);
        }
    }

    #[test]
    fn test_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"hand\": 3}").unwrap();
        assert!(read_poses(&path).is_err());
    }
}
