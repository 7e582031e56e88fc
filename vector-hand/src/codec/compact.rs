//! Compact layout: palm-local joints quantized to one byte per axis
//!
//! # Layout
//! ```text
//! 0x00: chirality u8 (0 = left, 1 = right)
//! 0x01: palm position (3 × f32)
//! 0x0D: palm rotation (smallest-three u32)
//! 0x11: joints (25 × [x, y, z] u8), palm-local, each axis over [-0.3, 0.3] m
//! ```
//!
//! A finger contributes five joints: its metacarpal base followed by the next joint
//! of each bone. Bones are therefore contiguous after decoding, and a pose whose
//! bones do not meet (within one quantization step) is rejected. Joints are stored
//! relative to the *quantized* palm rotation, so rotation quantization adds no
//! positional error.

use std::iter;

use byteorder::{ByteOrder, LittleEndian};
use glam::Vec3;

use crate::error::{CodecError, Result};
use crate::pose::{BoneType, FINGER_COUNT, HandPose};
use crate::quantize::{
    decode_quat_smallest_three, dequantize_unit_byte, encode_quat_smallest_three,
    quantize_unit_byte,
};

/// Largest palm-local coordinate representable per axis (meters)
pub const COMPACT_JOINT_RANGE: f32 = 0.3;

/// Distance between adjacent quantized values on one axis (meters)
pub const COMPACT_JOINT_STEP: f32 = 2.0 * COMPACT_JOINT_RANGE / 255.0;

const JOINTS_PER_FINGER: usize = 5;
const JOINT_COUNT: usize = FINGER_COUNT * JOINTS_PER_FINGER;

const PALM_POSITION_OFFSET: usize = 1;
const PALM_ROTATION_OFFSET: usize = PALM_POSITION_OFFSET + 12;
const JOINTS_OFFSET: usize = PALM_ROTATION_OFFSET + 4;

/// Size of one compact record (92 bytes)
pub const COMPACT_SIZE: usize = JOINTS_OFFSET + JOINT_COUNT * 3;

#[derive(Debug, Clone, PartialEq)]
pub(super) struct CompactHand {
    is_left: bool,
    palm_position: Vec3,
    palm_rotation: u32,
    joints: [[u8; 3]; JOINT_COUNT],
}

impl CompactHand {
    /// Quantize a validated pose
    pub(super) fn from_pose(pose: &HandPose) -> Result<Self> {
        let palm_rotation = encode_quat_smallest_three(pose.palm_rotation);
        let to_local = decode_quat_smallest_three(palm_rotation).inverse();

        let mut joints = [[0u8; 3]; JOINT_COUNT];
        for (finger_index, finger) in pose.fingers.iter().enumerate() {
            // Only the chain is stored; each bone must start where the previous one ends
            for (bone, pair) in BoneType::ALL[1..].iter().zip(finger.bones.windows(2)) {
                let gap = pair[0].next_joint.distance(pair[1].prev_joint);
                if gap > COMPACT_JOINT_STEP {
                    return Err(CodecError::DisconnectedBone {
                        finger: finger.finger_type,
                        bone: *bone,
                        gap,
                        limit: COMPACT_JOINT_STEP,
                    });
                }
            }

            let chain = iter::once(finger.bones[0].prev_joint)
                .chain(finger.bones.iter().map(|bone| bone.next_joint));

            for (k, world) in chain.enumerate() {
                let joint = finger_index * JOINTS_PER_FINGER + k;
                let local = (to_local * (world - pose.palm_position)).to_array();
                if let Some(&coordinate) = local.iter().find(|c| c.abs() > COMPACT_JOINT_RANGE) {
                    return Err(CodecError::JointOutOfRange {
                        joint,
                        coordinate,
                        limit: COMPACT_JOINT_RANGE,
                    });
                }
                joints[joint] =
                    local.map(|c| quantize_unit_byte(c, -COMPACT_JOINT_RANGE, COMPACT_JOINT_RANGE));
            }
        }

        Ok(Self {
            is_left: pose.is_left,
            palm_position: pose.palm_position,
            palm_rotation,
            joints,
        })
    }

    /// Write into a slice of exactly [`COMPACT_SIZE`] bytes
    pub(super) fn write(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), COMPACT_SIZE);
        out[0] = if self.is_left { 0x00 } else { 0x01 };
        LittleEndian::write_f32_into(
            &self.palm_position.to_array(),
            &mut out[PALM_POSITION_OFFSET..PALM_ROTATION_OFFSET],
        );
        LittleEndian::write_u32(&mut out[PALM_ROTATION_OFFSET..JOINTS_OFFSET], self.palm_rotation);
        for (chunk, joint) in out[JOINTS_OFFSET..].chunks_exact_mut(3).zip(&self.joints) {
            chunk.copy_from_slice(joint);
        }
    }

    /// Parse a slice of exactly [`COMPACT_SIZE`] bytes
    pub(super) fn read(bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), COMPACT_SIZE);
        let mut position = [0.0f32; 3];
        LittleEndian::read_f32_into(&bytes[PALM_POSITION_OFFSET..PALM_ROTATION_OFFSET], &mut position);

        let mut joints = [[0u8; 3]; JOINT_COUNT];
        for (joint, chunk) in joints.iter_mut().zip(bytes[JOINTS_OFFSET..].chunks_exact(3)) {
            joint.copy_from_slice(chunk);
        }

        Self {
            is_left: bytes[0] == 0x00,
            palm_position: Vec3::from_array(position),
            palm_rotation: LittleEndian::read_u32(&bytes[PALM_ROTATION_OFFSET..JOINTS_OFFSET]),
            joints,
        }
    }

    pub(super) fn to_pose(&self) -> HandPose {
        let palm_rotation = decode_quat_smallest_three(self.palm_rotation);
        let world = |joint: usize| {
            let local = Vec3::from_array(
                self.joints[joint]
                    .map(|b| dequantize_unit_byte(b, -COMPACT_JOINT_RANGE, COMPACT_JOINT_RANGE)),
            );
            self.palm_position + palm_rotation * local
        };

        HandPose::assemble(self.is_left, self.palm_position, palm_rotation, |finger, bone| {
            let base = finger * JOINTS_PER_FINGER + bone;
            (world(base), world(base + 1))
        })
    }
}
