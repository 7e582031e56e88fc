//! Hand codec: [`HandPose`] ⇄ fixed-size byte records
//!
//! Encoding runs in two steps so callers can lay records into buffers they own:
//!
//! ```text
//! HandPose --encode--> EncoderState --fill_bytes--> [u8] at offset
//! [u8] at offset --read_bytes--> DecoderState --decode--> HandPose
//! ```
//!
//! The record size depends only on the [`Layout`], never on the pose. Records carry
//! no field tags, so a stream of hands is simply records placed back to back.
//!
//! All checks (pose shape, buffer capacity, version, checksum) run before a byte is
//! written or the read offset moves.

mod compact;
mod framed;


use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};
use crate::pose::HandPose;

use compact::CompactHand;
use framed::FramedHand;

pub use compact::{COMPACT_JOINT_RANGE, COMPACT_JOINT_STEP, COMPACT_SIZE};
pub use framed::{FRAMED_SCHEMA_VERSION, FRAMED_SIZE};

/// Wire layout of one hand record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Version byte, f32 joints for every bone, xxh3 checksum (518 bytes)
    #[default]
    Framed,
    /// Palm-local joints quantized to one byte per axis (92 bytes)
    Compact,
}

impl Layout {
    pub const ALL: [Layout; 2] = [Layout::Framed, Layout::Compact];

    /// Size of one record in bytes
    pub const fn byte_count(self) -> usize {
        match self {
            Layout::Framed => FRAMED_SIZE,
            Layout::Compact => COMPACT_SIZE,
        }
    }

    /// Tag stored in `.vhs` stream headers
    pub const fn tag(self) -> u8 {
        match self {
            Layout::Framed => 0,
            Layout::Compact => 1,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|layout| layout.tag() == tag)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Layout::Framed => "framed",
            Layout::Compact => "compact",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|layout| layout.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown layout '{}' (expected framed or compact)", s))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Record {
    Framed(FramedHand),
    Compact(CompactHand),
}

impl Record {
    fn layout(&self) -> Layout {
        match self {
            Record::Framed(_) => Layout::Framed,
            Record::Compact(_) => Layout::Compact,
        }
    }
}

/// A pose gathered and normalized for one layout, ready to be laid out as bytes
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderState {
    record: Record,
}

impl EncoderState {
    pub fn layout(&self) -> Layout {
        self.record.layout()
    }
}

/// A record parsed from bytes, ready to be rebuilt into a pose
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderState {
    record: Record,
}

impl DecoderState {
    pub fn layout(&self) -> Layout {
        self.record.layout()
    }
}

/// Encoder/decoder for one [`Layout`]
///
/// Holds no state between calls; share it freely across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandCodec {
    layout: Layout,
}

impl HandCodec {
    pub const fn new(layout: Layout) -> Self {
        Self { layout }
    }

    pub const fn layout(&self) -> Layout {
        self.layout
    }

    /// Bytes occupied by one encoded hand
    pub const fn required_byte_count(&self) -> usize {
        self.layout.byte_count()
    }

    /// Validate `pose` and capture it for serialization
    pub fn encode(&self, pose: &HandPose) -> Result<EncoderState> {
        pose.validate()?;
        let record = match self.layout {
            Layout::Framed => Record::Framed(FramedHand::from_pose(pose)),
            Layout::Compact => Record::Compact(CompactHand::from_pose(pose)?),
        };
        Ok(EncoderState { record })
    }

    /// Write exactly [`required_byte_count`](Self::required_byte_count) bytes at `offset`
    pub fn fill_bytes(&self, state: &EncoderState, destination: &mut [u8], offset: usize) -> Result<()> {
        self.check_layout(state.layout())?;
        let span = self.span(destination.len(), offset)?;
        let out = &mut destination[span];
        match &state.record {
            Record::Framed(hand) => hand.write(out),
            Record::Compact(hand) => hand.write(out),
        }
        Ok(())
    }

    /// Parse one record at `*offset` and advance `offset` past it
    pub fn read_bytes(&self, source: &[u8], offset: &mut usize) -> Result<DecoderState> {
        let span = self.span(source.len(), *offset)?;
        let end = span.end;
        let bytes = &source[span];
        let record = match self.layout {
            Layout::Framed => Record::Framed(FramedHand::read(bytes)?),
            Layout::Compact => Record::Compact(CompactHand::read(bytes)),
        };
        *offset = end;
        Ok(DecoderState { record })
    }

    /// Rebuild a pose, deriving bone centers, rotations and widths
    pub fn decode(&self, state: &DecoderState) -> Result<HandPose> {
        self.check_layout(state.layout())?;
        Ok(match &state.record {
            Record::Framed(hand) => hand.to_pose(),
            Record::Compact(hand) => hand.to_pose(),
        })
    }

    // ========================================================================
    // Convenience wrappers
    // ========================================================================

    /// Encode `pose` into a freshly allocated record
    pub fn encode_to_vec(&self, pose: &HandPose) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; self.required_byte_count()];
        self.write_pose(pose, &mut bytes, 0)?;
        Ok(bytes)
    }

    /// [`encode`](Self::encode) then [`fill_bytes`](Self::fill_bytes)
    pub fn write_pose(&self, pose: &HandPose, destination: &mut [u8], offset: usize) -> Result<()> {
        // capacity first so a bad buffer is reported even for a bad pose
        self.span(destination.len(), offset)?;
        let state = self.encode(pose)?;
        self.fill_bytes(&state, destination, offset)
    }

    /// [`read_bytes`](Self::read_bytes) then [`decode`](Self::decode)
    pub fn read_pose(&self, source: &[u8], offset: &mut usize) -> Result<HandPose> {
        let state = self.read_bytes(source, offset)?;
        self.decode(&state)
    }

    /// Decode every record in a buffer of back-to-back hands
    ///
    /// Trailing bytes shorter than one record fail with [`CodecError::BufferTooSmall`].
    pub fn decode_all(&self, source: &[u8]) -> Result<Vec<HandPose>> {
        let mut poses = Vec::with_capacity(source.len() / self.required_byte_count());
        let mut offset = 0;
        while offset < source.len() {
            poses.push(self.read_pose(source, &mut offset)?);
        }
        Ok(poses)
    }

    fn check_layout(&self, found: Layout) -> Result<()> {
        if found != self.layout {
            return Err(CodecError::LayoutMismatch {
                expected: self.layout,
                found,
            });
        }
        Ok(())
    }

    fn span(&self, len: usize, offset: usize) -> Result<Range<usize>> {
        let required = self.required_byte_count();
        match offset.checked_add(required) {
            Some(end) if end <= len => Ok(offset..end),
            _ => Err(CodecError::BufferTooSmall {
                required,
                offset,
                available: len.saturating_sub(offset),
            }),
        }
    }
}
