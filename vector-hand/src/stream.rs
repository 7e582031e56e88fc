//! Hand stream container (.vhs)
//!
//! A header followed by fixed-size hand records written back to back. Every record
//! in a stream uses the layout named by the header.
//!
//! # Layout
//! ```text
//! 0x00: layout tag u8 (0 = framed, 1 = compact)
//! 0x01: flags u8 (reserved, 0)
//! 0x02: reserved u16
//! 0x04: hand_count u32
//! 0x08: records (hand_count × layout.byte_count())
//! ```

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::codec::{HandCodec, Layout};
use crate::error::StreamError;
use crate::pose::HandPose;

/// File extension for hand streams
pub const HAND_STREAM_EXT: &str = "vhs";

/// Stream header (8 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandStreamHeader {
    pub layout: Layout,
    /// Reserved flags (must be 0)
    pub flags: u8,
    pub hand_count: u32,
}

impl HandStreamHeader {
    pub const SIZE: usize = 8;

    pub fn new(layout: Layout, hand_count: u32) -> Self {
        Self {
            layout,
            flags: 0,
            hand_count,
        }
    }

    /// Size of the record section
    pub fn data_size(&self) -> usize {
        self.hand_count as usize * self.layout.byte_count()
    }

    /// Header plus records
    pub fn file_size(&self) -> usize {
        Self::SIZE + self.data_size()
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u8(self.layout.tag())?;
        writer.write_u8(self.flags)?;
        writer.write_u16::<LittleEndian>(0)?;
        writer.write_u32::<LittleEndian>(self.hand_count)?;
        Ok(())
    }

    fn read_from<R: Read>(reader: &mut R) -> Result<Self, StreamError> {
        let tag = reader.read_u8()?;
        let layout = Layout::from_tag(tag).ok_or(StreamError::UnknownLayout(tag))?;
        let flags = reader.read_u8()?;
        let _reserved = reader.read_u16::<LittleEndian>()?;
        let hand_count = reader.read_u32::<LittleEndian>()?;
        Ok(Self {
            layout,
            flags,
            hand_count,
        })
    }
}

/// Writer for hand streams
pub struct HandStreamWriter<W: Write> {
    writer: W,
    codec: HandCodec,
}

impl<W: Write> HandStreamWriter<W> {
    pub fn new(writer: W, layout: Layout) -> Self {
        Self {
            writer,
            codec: HandCodec::new(layout),
        }
    }

    /// Write a header and one record per pose
    ///
    /// Every pose is encoded before anything reaches the writer, so a malformed
    /// pose leaves the output untouched.
    pub fn write_stream(&mut self, poses: &[HandPose]) -> Result<HandStreamHeader, StreamError> {
        let hand_count =
            u32::try_from(poses.len()).map_err(|_| StreamError::TooManyHands(poses.len()))?;
        let header = HandStreamHeader::new(self.codec.layout(), hand_count);

        let size = self.codec.required_byte_count();
        let mut records = vec![0u8; header.data_size()];
        for (i, pose) in poses.iter().enumerate() {
            self.codec.write_pose(pose, &mut records, i * size)?;
        }

        header.write_to(&mut self.writer)?;
        self.writer.write_all(&records)?;
        self.writer.flush()?;

        tracing::debug!(
            "Wrote {} {} hands ({} bytes)",
            hand_count,
            header.layout,
            header.file_size()
        );
        Ok(header)
    }

    /// Consume the writer and return the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Reader for hand streams
pub struct HandStreamReader<R: Read> {
    reader: R,
}

impl<R: Read> HandStreamReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read only the header
    pub fn read_header(&mut self) -> Result<HandStreamHeader, StreamError> {
        let header = HandStreamHeader::read_from(&mut self.reader)?;
        if header.flags != 0 {
            tracing::warn!("Ignoring unknown stream flags {:#04x}", header.flags);
        }
        Ok(header)
    }

    /// Read the header and every record
    pub fn read_stream(&mut self) -> Result<(HandStreamHeader, Vec<HandPose>), StreamError> {
        let header = self.read_header()?;
        let codec = HandCodec::new(header.layout);

        let mut record = vec![0u8; codec.required_byte_count()];
        let mut poses = Vec::with_capacity(header.hand_count.min(4096) as usize);
        for read in 0..header.hand_count {
            if let Err(e) = self.reader.read_exact(&mut record) {
                return Err(match e.kind() {
                    io::ErrorKind::UnexpectedEof => StreamError::Truncated {
                        expected: header.hand_count,
                        read,
                    },
                    _ => StreamError::Io(e),
                });
            }
            let mut offset = 0;
            poses.push(codec.read_pose(&record, &mut offset)?);
        }

        tracing::debug!("Read {} {} hands", poses.len(), header.layout);
        Ok((header, poses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;
    use glam::{Quat, Vec3};

    fn moving_hands(count: usize) -> Vec<HandPose> {
        (0..count)
            .map(|i| {
                HandPose::reference(i % 2 == 0).transformed(
                    Vec3::new(0.01 * i as f32, 1.0, 0.3),
                    Quat::from_rotation_y(0.1 * i as f32),
                )
            })
            .collect()
    }

    #[test]
    fn test_roundtrip_stream() {
        for layout in Layout::ALL {
            let hands = moving_hands(6);
            let mut buffer = Vec::new();
            let header = HandStreamWriter::new(&mut buffer, layout)
                .write_stream(&hands)
                .unwrap();

            assert_eq!(header.hand_count, 6);
            assert_eq!(buffer.len(), header.file_size());
            assert_eq!(buffer.len(), 8 + 6 * layout.byte_count());

            let (parsed, decoded) = HandStreamReader::new(buffer.as_slice())
                .read_stream()
                .unwrap();
            assert_eq!(parsed, header);
            assert_eq!(decoded.len(), hands.len());
            for (a, b) in hands.iter().zip(&decoded) {
                assert_eq!(a.is_left, b.is_left);
                assert!(a.palm_position.distance(b.palm_position) < 0.01);
            }
        }
    }

    #[test]
    fn test_empty_stream() {
        let mut buffer = Vec::new();
        HandStreamWriter::new(&mut buffer, Layout::Compact)
            .write_stream(&[])
            .unwrap();
        assert_eq!(buffer, vec![1, 0, 0, 0, 0, 0, 0, 0]);

        let (header, hands) = HandStreamReader::new(buffer.as_slice())
            .read_stream()
            .unwrap();
        assert_eq!(header.layout, Layout::Compact);
        assert!(hands.is_empty());
    }

    #[test]
    fn test_unknown_layout_tag() {
        let bytes = [7u8, 0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(
            HandStreamReader::new(&bytes[..]).read_header(),
            Err(StreamError::UnknownLayout(7))
        ));
    }

    #[test]
    fn test_truncated_stream() {
        let mut buffer = Vec::new();
        HandStreamWriter::new(&mut buffer, Layout::Framed)
            .write_stream(&moving_hands(3))
            .unwrap();
        buffer.truncate(buffer.len() - 10);

        assert!(matches!(
            HandStreamReader::new(buffer.as_slice()).read_stream(),
            Err(StreamError::Truncated {
                expected: 3,
                read: 2
            })
        ));
    }

    #[test]
    fn test_malformed_pose_writes_nothing() {
        let mut hands = moving_hands(2);
        hands[1].fingers.pop();

        let mut buffer = Vec::new();
        let result = HandStreamWriter::new(&mut buffer, Layout::Framed).write_stream(&hands);
        assert!(matches!(
            result,
            Err(StreamError::Codec(CodecError::MalformedPose(_)))
        ));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_corrupt_record_surfaces_codec_error() {
        let mut buffer = Vec::new();
        HandStreamWriter::new(&mut buffer, Layout::Framed)
            .write_stream(&moving_hands(1))
            .unwrap();
        buffer[HandStreamHeader::SIZE + 40] ^= 0xFF;

        assert!(matches!(
            HandStreamReader::new(buffer.as_slice()).read_stream(),
            Err(StreamError::Codec(CodecError::ChecksumMismatch { .. }))
        ));
    }
}
