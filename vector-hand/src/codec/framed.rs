//! Framed layout: full-precision joints with a version byte and checksum
//!
//! # Layout
//! ```text
//! 0x000: schema version u8 (currently 1)
//! 0x001: chirality u8 (1 = left, 0 = right)
//! 0x002: palm position (3 × f32)
//! 0x00E: palm rotation (4 × f32, x y z w)
//! 0x01E: bones (20 × [prev_joint 3 × f32, next_joint 3 × f32]), thumb→pinky, metacarpal→distal
//! 0x1FE: xxh3-64 of bytes 0x000..0x1FE (u64)
//! ```
//!
//! All values little-endian. Bone centers are not stored; decode recomputes them.

use byteorder::{ByteOrder, LittleEndian};
use glam::{Quat, Vec3};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::{CodecError, Result};
use crate::pose::{BONE_COUNT, BONES_PER_FINGER, HandPose};

/// Schema version written into every framed record
pub const FRAMED_SCHEMA_VERSION: u8 = 1;

const VEC3_SIZE: usize = 12;
const QUAT_SIZE: usize = 16;
const BONE_SIZE: usize = 2 * VEC3_SIZE;

const PALM_POSITION_OFFSET: usize = 2;
const PALM_ROTATION_OFFSET: usize = PALM_POSITION_OFFSET + VEC3_SIZE;
const BONES_OFFSET: usize = PALM_ROTATION_OFFSET + QUAT_SIZE;
const CHECKSUM_OFFSET: usize = BONES_OFFSET + BONE_COUNT * BONE_SIZE;

/// Size of one framed record (518 bytes)
pub const FRAMED_SIZE: usize = CHECKSUM_OFFSET + 8;

#[derive(Debug, Clone, PartialEq)]
pub(super) struct FramedHand {
    is_left: bool,
    palm_position: Vec3,
    palm_rotation: Quat,
    /// (prev_joint, next_joint) per bone in wire order
    joints: [(Vec3, Vec3); BONE_COUNT],
}

impl FramedHand {
    /// Capture a validated pose
    pub(super) fn from_pose(pose: &HandPose) -> Self {
        let mut joints = [(Vec3::ZERO, Vec3::ZERO); BONE_COUNT];
        for (slot, pair) in joints.iter_mut().zip(pose.joint_pairs()) {
            *slot = pair;
        }
        Self {
            is_left: pose.is_left,
            palm_position: pose.palm_position,
            palm_rotation: pose.palm_rotation.normalize(),
            joints,
        }
    }

    /// Write into a slice of exactly [`FRAMED_SIZE`] bytes
    pub(super) fn write(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), FRAMED_SIZE);
        out[0] = FRAMED_SCHEMA_VERSION;
        out[1] = u8::from(self.is_left);
        write_vec3(&mut out[PALM_POSITION_OFFSET..], self.palm_position);
        LittleEndian::write_f32_into(
            &self.palm_rotation.to_array(),
            &mut out[PALM_ROTATION_OFFSET..BONES_OFFSET],
        );
        for (i, (prev, next)) in self.joints.iter().enumerate() {
            let at = BONES_OFFSET + i * BONE_SIZE;
            write_vec3(&mut out[at..], *prev);
            write_vec3(&mut out[at + VEC3_SIZE..], *next);
        }
        let checksum = xxh3_64(&out[..CHECKSUM_OFFSET]);
        LittleEndian::write_u64(&mut out[CHECKSUM_OFFSET..FRAMED_SIZE], checksum);
    }

    /// Parse a slice of exactly [`FRAMED_SIZE`] bytes
    pub(super) fn read(bytes: &[u8]) -> Result<Self> {
        debug_assert_eq!(bytes.len(), FRAMED_SIZE);
        if bytes[0] != FRAMED_SCHEMA_VERSION {
            return Err(CodecError::UnsupportedVersion(bytes[0]));
        }
        let stored = LittleEndian::read_u64(&bytes[CHECKSUM_OFFSET..FRAMED_SIZE]);
        let computed = xxh3_64(&bytes[..CHECKSUM_OFFSET]);
        if stored != computed {
            return Err(CodecError::ChecksumMismatch { stored, computed });
        }

        let mut rotation = [0.0f32; 4];
        LittleEndian::read_f32_into(&bytes[PALM_ROTATION_OFFSET..BONES_OFFSET], &mut rotation);

        let mut joints = [(Vec3::ZERO, Vec3::ZERO); BONE_COUNT];
        for (i, slot) in joints.iter_mut().enumerate() {
            let at = BONES_OFFSET + i * BONE_SIZE;
            *slot = (read_vec3(&bytes[at..]), read_vec3(&bytes[at + VEC3_SIZE..]));
        }

        Ok(Self {
            is_left: bytes[1] != 0,
            palm_position: read_vec3(&bytes[PALM_POSITION_OFFSET..]),
            palm_rotation: Quat::from_array(rotation),
            joints,
        })
    }

    pub(super) fn to_pose(&self) -> HandPose {
        HandPose::assemble(
            self.is_left,
            self.palm_position,
            self.palm_rotation,
            |finger, bone| self.joints[finger * BONES_PER_FINGER + bone],
        )
    }
}

fn write_vec3(out: &mut [u8], v: Vec3) {
    LittleEndian::write_f32_into(&v.to_array(), &mut out[..VEC3_SIZE]);
}

fn read_vec3(bytes: &[u8]) -> Vec3 {
    let mut v = [0.0f32; 3];
    LittleEndian::read_f32_into(&bytes[..VEC3_SIZE], &mut v);
    Vec3::from_array(v)
}
