//! Fixed-size binary encoding of tracked hand skeletons
//!
//! This crate turns a [`HandPose`] (palm plus five fingers of four bones each)
//! into a fixed number of bytes and back, for per-frame hand streaming or storage.
//!
//! # Modules
//!
//! - [`pose`] - Plain hand skeleton records (no engine back-references)
//! - [`codec`] - [`HandCodec`] and its two wire layouts
//! - [`quantize`] - Smallest-three quaternions and 8-bit range quantization
//! - [`stream`] - `.vhs` container holding many encoded hands back to back
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```
//! use vector_hand::{HandCodec, HandPose};
//!
//! let codec = HandCodec::default();
//! let pose = HandPose::reference(false);
//!
//! let mut buffer = vec![0u8; codec.required_byte_count()];
//! let state = codec.encode(&pose).unwrap();
//! codec.fill_bytes(&state, &mut buffer, 0).unwrap();
//!
//! let mut offset = 0;
//! let state = codec.read_bytes(&buffer, &mut offset).unwrap();
//! let decoded = codec.decode(&state).unwrap();
//!
//! assert_eq!(offset, codec.required_byte_count());
//! assert!(decoded.palm_position.distance(pose.palm_position) < 0.01);
//! ```

pub mod codec;
pub mod error;
pub mod pose;
pub mod quantize;
pub mod stream;

pub use codec::{DecoderState, EncoderState, HandCodec, Layout};
pub use error::{CodecError, PoseDefect, StreamError};
pub use pose::{BONES_PER_FINGER, BonePose, BoneType, FINGER_COUNT, FingerPose, FingerType, HandPose};
pub use quantize::{
    decode_quat_smallest_three, dequantize_unit_byte, encode_quat_smallest_three,
    quantize_unit_byte,
};
pub use stream::{HAND_STREAM_EXT, HandStreamHeader, HandStreamReader, HandStreamWriter};
