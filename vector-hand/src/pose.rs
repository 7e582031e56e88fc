//! Hand skeleton records
//!
//! Plain data with no references into any scene graph. A tracking source builds a
//! [`HandPose`] per frame and hands it to the codec; the codec hands fresh ones back.
//!
//! # Palm frame
//!
//! `palm_rotation` maps palm-local axes to world axes:
//! - local +Z points from the wrist towards the fingers ([`HandPose::direction`])
//! - local +Y points out of the back of the hand ([`HandPose::up`])
//! - local -Y is the palm normal ([`HandPose::palm_normal`])

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::PoseDefect;

/// Number of fingers in a hand
pub const FINGER_COUNT: usize = 5;

/// Number of bones in a finger
pub const BONES_PER_FINGER: usize = 4;

/// Number of bones in a hand
pub const BONE_COUNT: usize = FINGER_COUNT * BONES_PER_FINGER;

/// Digit identity, in anatomical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FingerType {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl FingerType {
    /// All fingers in wire order
    pub const ALL: [FingerType; FINGER_COUNT] = [
        FingerType::Thumb,
        FingerType::Index,
        FingerType::Middle,
        FingerType::Ring,
        FingerType::Pinky,
    ];

    /// Position of this finger in [`FingerType::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Bone width used when a decoded pose carries no width of its own (meters)
    pub const fn default_width(self) -> f32 {
        match self {
            FingerType::Thumb => 0.020,
            FingerType::Index => 0.018,
            FingerType::Middle => 0.018,
            FingerType::Ring => 0.017,
            FingerType::Pinky => 0.015,
        }
    }
}

/// Bone identity within a finger, proximal to distal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoneType {
    Metacarpal,
    Proximal,
    Intermediate,
    Distal,
}

impl BoneType {
    /// All bones in wire order
    pub const ALL: [BoneType; BONES_PER_FINGER] = [
        BoneType::Metacarpal,
        BoneType::Proximal,
        BoneType::Intermediate,
        BoneType::Distal,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One rigid finger segment
///
/// Only `prev_joint` and `next_joint` are carried on the wire. `center`,
/// `rotation` and `width` are derived again when a pose is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonePose {
    /// Joint closer to the wrist
    pub prev_joint: Vec3,
    /// Joint closer to the fingertip
    pub next_joint: Vec3,
    /// Midpoint of the two joints
    ///
    /// Not carried on the wire. Poses read from outside the codec may omit it; call
    /// [`HandPose::refresh_centers`] after editing joints by hand.
    #[serde(default)]
    pub center: Vec3,
    /// Orientation; local +Z runs along the bone, local +Y follows the back of the hand
    #[serde(default)]
    pub rotation: Quat,
    /// Bone thickness (meters)
    #[serde(default)]
    pub width: f32,
}

impl BonePose {
    /// Build a bone between two joints, deriving center and rotation
    ///
    /// `up` is the back-of-hand direction. A zero-length bone (the thumb metacarpal
    /// on most trackers) takes its rotation from `fallback`.
    pub fn between(prev_joint: Vec3, next_joint: Vec3, up: Vec3, fallback: Quat, width: f32) -> Self {
        let rotation = look_rotation(next_joint - prev_joint, up).unwrap_or(fallback);
        Self {
            prev_joint,
            next_joint,
            center: (prev_joint + next_joint) * 0.5,
            rotation,
            width,
        }
    }

    pub fn length(&self) -> f32 {
        self.prev_joint.distance(self.next_joint)
    }

    /// Unit vector from `prev_joint` to `next_joint`, or zero for a degenerate bone
    pub fn direction(&self) -> Vec3 {
        (self.next_joint - self.prev_joint).normalize_or_zero()
    }
}

/// One digit: four bones from metacarpal to distal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerPose {
    pub finger_type: FingerType,
    pub bones: Vec<BonePose>,
}

impl FingerPose {
    /// Fingertip position (distal bone's next joint)
    pub fn tip(&self) -> Option<Vec3> {
        self.bones.last().map(|bone| bone.next_joint)
    }

    pub fn bone(&self, bone_type: BoneType) -> Option<&BonePose> {
        self.bones.get(bone_type.index())
    }
}

/// Skeletal snapshot of one hand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandPose {
    pub is_left: bool,
    pub palm_position: Vec3,
    pub palm_rotation: Quat,
    /// Thumb to pinky
    pub fingers: Vec<FingerPose>,
}

impl HandPose {
    /// Check the shape the wire format relies on
    ///
    /// Five fingers in [`FingerType::ALL`] order, four bones each, finite coordinates.
    pub fn validate(&self) -> Result<(), PoseDefect> {
        if self.fingers.len() != FINGER_COUNT {
            return Err(PoseDefect::FingerCount(self.fingers.len()));
        }
        if !self.palm_position.is_finite() {
            return Err(PoseDefect::NonFinite("palm position"));
        }
        if !self.palm_rotation.is_finite() {
            return Err(PoseDefect::NonFinite("palm rotation"));
        }
        if self.palm_rotation.length_squared() <= f32::EPSILON {
            return Err(PoseDefect::DegenerateRotation);
        }

        for (index, (finger, expected)) in self.fingers.iter().zip(FingerType::ALL).enumerate() {
            if finger.finger_type != expected {
                return Err(PoseDefect::FingerOrder {
                    index,
                    expected,
                    found: finger.finger_type,
                });
            }
            if finger.bones.len() != BONES_PER_FINGER {
                return Err(PoseDefect::BoneCount {
                    finger: expected,
                    count: finger.bones.len(),
                });
            }
            if finger
                .bones
                .iter()
                .any(|bone| !bone.prev_joint.is_finite() || !bone.next_joint.is_finite())
            {
                return Err(PoseDefect::NonFinite("bone joint"));
            }
        }

        Ok(())
    }

    /// Reset every bone's `center` to the midpoint of its joints
    pub fn refresh_centers(&mut self) {
        for bone in self.fingers.iter_mut().flat_map(|f| f.bones.iter_mut()) {
            bone.center = (bone.prev_joint + bone.next_joint) * 0.5;
        }
    }

    pub fn finger(&self, finger_type: FingerType) -> Option<&FingerPose> {
        self.fingers.iter().find(|f| f.finger_type == finger_type)
    }

    /// Unit vector from the wrist towards the fingers
    pub fn direction(&self) -> Vec3 {
        self.palm_rotation * Vec3::Z
    }

    /// Unit vector out of the back of the hand
    pub fn up(&self) -> Vec3 {
        self.palm_rotation * Vec3::Y
    }

    /// Unit vector out of the palm
    pub fn palm_normal(&self) -> Vec3 {
        self.palm_rotation * Vec3::NEG_Y
    }

    /// Joint positions in wire order: per finger, each bone's (prev, next)
    pub fn joint_pairs(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.fingers
            .iter()
            .flat_map(|finger| finger.bones.iter().map(|b| (b.prev_joint, b.next_joint)))
    }

    /// Assemble a pose from palm data and a joint source
    ///
    /// `joints(finger, bone)` returns the bone's (prev, next) joints. Centers, rotations
    /// and default widths are derived.
    pub fn assemble(
        is_left: bool,
        palm_position: Vec3,
        palm_rotation: Quat,
        mut joints: impl FnMut(usize, usize) -> (Vec3, Vec3),
    ) -> Self {
        let up = palm_rotation * Vec3::Y;
        let fingers = FingerType::ALL
            .iter()
            .map(|&finger_type| {
                let bones = (0..BONES_PER_FINGER)
                    .map(|bone| {
                        let (prev, next) = joints(finger_type.index(), bone);
                        BonePose::between(prev, next, up, palm_rotation, finger_type.default_width())
                    })
                    .collect();
                FingerPose { finger_type, bones }
            })
            .collect();

        Self {
            is_left,
            palm_position,
            palm_rotation,
            fingers,
        }
    }

    /// Rigidly move the whole hand: rotate about the world origin, then translate
    pub fn transformed(&self, translation: Vec3, rotation: Quat) -> Self {
        let apply = |p: Vec3| rotation * p + translation;
        let fingers = self
            .fingers
            .iter()
            .map(|finger| FingerPose {
                finger_type: finger.finger_type,
                bones: finger
                    .bones
                    .iter()
                    .map(|bone| BonePose {
                        prev_joint: apply(bone.prev_joint),
                        next_joint: apply(bone.next_joint),
                        center: apply(bone.center),
                        rotation: rotation * bone.rotation,
                        width: bone.width,
                    })
                    .collect(),
            })
            .collect();

        Self {
            is_left: self.is_left,
            palm_position: apply(self.palm_position),
            palm_rotation: rotation * self.palm_rotation,
            fingers,
        }
    }

    /// Blend two poses of the same hand
    ///
    /// Positions are lerped, rotations slerped; chirality is taken from `self`.
    /// Both poses must pass [`HandPose::validate`].
    pub fn lerp(&self, other: &HandPose, t: f32) -> Result<HandPose, PoseDefect> {
        self.validate()?;
        other.validate()?;

        let palm_rotation = self
            .palm_rotation
            .normalize()
            .slerp(other.palm_rotation.normalize(), t);
        let mut pose = HandPose::assemble(
            self.is_left,
            self.palm_position.lerp(other.palm_position, t),
            palm_rotation,
            |finger, bone| {
                let a = &self.fingers[finger].bones[bone];
                let b = &other.fingers[finger].bones[bone];
                (a.prev_joint.lerp(b.prev_joint, t), a.next_joint.lerp(b.next_joint, t))
            },
        );

        for (finger, (a, b)) in pose
            .fingers
            .iter_mut()
            .zip(self.fingers.iter().zip(&other.fingers))
        {
            for (bone, (ba, bb)) in finger.bones.iter_mut().zip(a.bones.iter().zip(&b.bones)) {
                bone.width = ba.width + (bb.width - ba.width) * t;
            }
        }

        Ok(pose)
    }

    /// Open, relaxed hand at the origin with identity palm rotation
    ///
    /// Joint offsets are a right-hand rest pose; the left hand mirrors it across X.
    pub fn reference(is_left: bool) -> Self {
        let mirror = if is_left { Vec3::new(-1.0, 1.0, 1.0) } else { Vec3::ONE };

        let mut pose = HandPose::assemble(is_left, Vec3::ZERO, Quat::IDENTITY, |finger, bone| {
            let rest = &REST_FINGERS[finger];
            let segment = |k: usize| {
                let bent = rest.direction + Vec3::new(0.0, -CURL_PER_BONE * k as f32, 0.0);
                bent.normalize_or_zero() * rest.lengths[k]
            };
            let prev = (0..bone).fold(rest.base, |joint, k| joint + segment(k));
            (prev * mirror, (prev + segment(bone)) * mirror)
        });

        for finger in &mut pose.fingers {
            for bone in &mut finger.bones {
                bone.width = finger.finger_type.default_width();
            }
        }
        pose
    }
}

/// Rotation whose +Z follows `forward` and whose +Y leans towards `up`
fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let z = forward.try_normalize()?;
    match up.cross(z).try_normalize() {
        Some(x) => {
            let y = z.cross(x);
            Some(Quat::from_mat3(&Mat3::from_cols(x, y, z)))
        }
        // forward parallel to up
        None => Some(Quat::from_rotation_arc(Vec3::Z, z)),
    }
}

// ============================================================================
// Rest pose (right hand, palm-local, meters)
// ============================================================================

struct RestFinger {
    base: Vec3,
    direction: Vec3,
    lengths: [f32; BONES_PER_FINGER],
}

/// Downward bend added to each successive bone
const CURL_PER_BONE: f32 = 0.15;

const REST_FINGERS: [RestFinger; FINGER_COUNT] = [
    // Thumb metacarpal is zero-length, as trackers report it
    RestFinger {
        base: Vec3::new(-0.020, -0.005, -0.030),
        direction: Vec3::new(-0.50, 0.0, 0.85),
        lengths: [0.0, 0.046, 0.032, 0.026],
    },
    RestFinger {
        base: Vec3::new(-0.015, 0.0, -0.040),
        direction: Vec3::new(-0.08, 0.0, 1.0),
        lengths: [0.068, 0.039, 0.022, 0.016],
    },
    RestFinger {
        base: Vec3::new(-0.004, 0.0, -0.040),
        direction: Vec3::new(0.0, 0.0, 1.0),
        lengths: [0.064, 0.044, 0.026, 0.017],
    },
    RestFinger {
        base: Vec3::new(0.007, 0.0, -0.038),
        direction: Vec3::new(0.06, 0.0, 1.0),
        lengths: [0.058, 0.041, 0.025, 0.017],
    },
    RestFinger {
        base: Vec3::new(0.017, 0.0, -0.035),
        direction: Vec3::new(0.14, 0.0, 1.0),
        lengths: [0.053, 0.032, 0.018, 0.015],
    },
];
