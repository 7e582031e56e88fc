//! Error types for hand encoding

use crate::codec::Layout;
use crate::pose::{BoneType, FingerType};

/// Why a [`HandPose`](crate::HandPose) cannot be encoded
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PoseDefect {
    #[error("expected 5 fingers, found {0}")]
    FingerCount(usize),

    #[error("finger {index} is {found:?}, expected {expected:?}")]
    FingerOrder {
        index: usize,
        expected: FingerType,
        found: FingerType,
    },

    #[error("{finger:?} has {count} bones, expected 4")]
    BoneCount { finger: FingerType, count: usize },

    #[error("non-finite coordinate in {0}")]
    NonFinite(&'static str),

    #[error("palm rotation has zero length")]
    DegenerateRotation,
}

/// Errors raised by [`HandCodec`](crate::HandCodec)
///
/// Every variant is detected before any byte is written or read.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("malformed hand pose: {0}")]
    MalformedPose(#[from] PoseDefect),

    #[error("buffer too small: need {required} bytes at offset {offset}, have {available}")]
    BufferTooSmall {
        required: usize,
        offset: usize,
        available: usize,
    },

    #[error("state was built for the {found:?} layout, codec uses {expected:?}")]
    LayoutMismatch { expected: Layout, found: Layout },

    #[error("unsupported schema version: {0}")]
    UnsupportedVersion(u8),

    #[error("checksum mismatch: stored {stored:#018x}, computed {computed:#018x}")]
    ChecksumMismatch { stored: u64, computed: u64 },

    #[error("joint {joint} is {coordinate:.3} m from the palm on one axis (limit {limit} m)")]
    JointOutOfRange {
        joint: usize,
        coordinate: f32,
        limit: f32,
    },

    #[error("{finger:?} {bone:?} starts {gap:.4} m from the previous bone's end (limit {limit:.4} m)")]
    DisconnectedBone {
        finger: FingerType,
        bone: BoneType,
        gap: f32,
        limit: f32,
    },
}

/// Errors raised while reading or writing a `.vhs` stream
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("unknown layout tag: {0}")]
    UnknownLayout(u8),

    #[error("stream truncated: header announces {expected} hands, read {read}")]
    Truncated { expected: u32, read: u32 },

    #[error("too many hands for one stream: {0}")]
    TooManyHands(usize),
}

/// Codec result type
pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            CodecError::from(PoseDefect::FingerCount(4)).to_string(),
            "malformed hand pose: expected 5 fingers, found 4"
        );
        assert_eq!(
            CodecError::BufferTooSmall {
                required: 518,
                offset: 2,
                available: 100
            }
            .to_string(),
            "buffer too small: need 518 bytes at offset 2, have 100"
        );
        assert_eq!(
            CodecError::UnsupportedVersion(9).to_string(),
            "unsupported schema version: 9"
        );
        assert_eq!(
            StreamError::UnknownLayout(7).to_string(),
            "unknown layout tag: 7"
        );
    }
}
