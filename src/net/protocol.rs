//! Wire format for replicating destruction results.
//!
//! Messages are length-free records framed by a leading tag byte, all
//! multi-byte fields little-endian. Section diffs carry either the
//! explicit changed indices or just the full-clear flag; heightmap
//! messages carry a column's 256 sky-light source heights as absolute
//! world-y values.

use std::io::{self, Read, Write};

use crate::destruction::diff::SectionDiff;
use crate::math::coords::{ChunkPos, LocalIndex, SECTION_VOLUME, SectionPos};

const TAG_SECTION_DIFF: u8 = 0;
const TAG_HEIGHT_MAP: u8 = 1;

/// One section's replicated change set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionDiffMessage {
    pub section: SectionPos,
    /// The whole section became air; `indices` is empty.
    pub full_clear: bool,
    /// Voxels changed light, not contents.
    pub light_only: bool,
    /// Packed local indices, ascending.
    pub indices: Vec<u16>,
}

impl SectionDiffMessage {
    /// Build from an accumulated diff.
    pub fn from_diff(section: SectionPos, diff: &SectionDiff, light_only: bool) -> Self {
        match diff {
            SectionDiff::FullClear => Self {
                section,
                full_clear: true,
                light_only,
                indices: Vec::new(),
            },
            SectionDiff::Partial(bits) => Self {
                section,
                full_clear: false,
                light_only,
                indices: bits.indices().map(LocalIndex::raw).collect(),
            },
        }
    }
}

/// A chunk column's updated sky-light source heights.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeightMapMessage {
    pub chunk: ChunkPos,
    /// World-y of the topmost blocker per (x, z), indexed `x + 16 * z`.
    pub heights: Box<[i32; 256]>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WireMessage {
    SectionDiff(SectionDiffMessage),
    HeightMap(HeightMapMessage),
}

impl WireMessage {
    pub fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        match self {
            WireMessage::SectionDiff(msg) => {
                writer.write_all(&[TAG_SECTION_DIFF])?;
                writer.write_all(&msg.section.x.to_le_bytes())?;
                writer.write_all(&msg.section.y.to_le_bytes())?;
                writer.write_all(&msg.section.z.to_le_bytes())?;
                writer.write_all(&[msg.full_clear as u8, msg.light_only as u8])?;
                if !msg.full_clear {
                    writer.write_all(&(msg.indices.len() as u32).to_le_bytes())?;
                    for index in &msg.indices {
                        writer.write_all(&index.to_le_bytes())?;
                    }
                }
            }
            WireMessage::HeightMap(msg) => {
                writer.write_all(&[TAG_HEIGHT_MAP])?;
                writer.write_all(&msg.chunk.x.to_le_bytes())?;
                writer.write_all(&msg.chunk.z.to_le_bytes())?;
                for height in msg.heights.iter() {
                    writer.write_all(&height.to_le_bytes())?;
                }
            }
        }
        Ok(())
    }

    pub fn decode<R: Read>(reader: &mut R) -> io::Result<Self> {
        match read_u8(reader)? {
            TAG_SECTION_DIFF => {
                let section = SectionPos::new(
                    read_i32(reader)?,
                    read_i32(reader)?,
                    read_i32(reader)?,
                );
                let full_clear = read_u8(reader)? != 0;
                let light_only = read_u8(reader)? != 0;
                let indices = if full_clear {
                    Vec::new()
                } else {
                    let count = read_u32(reader)? as usize;
                    let mut indices = Vec::with_capacity(count.min(SECTION_VOLUME));
                    for _ in 0..count {
                        let raw = read_u16(reader)?;
                        if raw as usize >= SECTION_VOLUME {
                            return Err(io::Error::new(
                                io::ErrorKind::InvalidData,
                                format!("voxel index out of range: {}", raw),
                            ));
                        }
                        indices.push(raw);
                    }
                    indices
                };
                Ok(WireMessage::SectionDiff(SectionDiffMessage {
                    section,
                    full_clear,
                    light_only,
                    indices,
                }))
            }
            TAG_HEIGHT_MAP => {
                let chunk = ChunkPos::new(read_i32(reader)?, read_i32(reader)?);
                let mut heights = Box::new([0i32; 256]);
                for slot in heights.iter_mut() {
                    *slot = read_i32(reader)?;
                }
                Ok(WireMessage::HeightMap(HeightMapMessage { chunk, heights }))
            }
            tag => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unknown message tag: {}", tag),
            )),
        }
    }
}

fn read_u8<R: Read>(reader: &mut R) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u16<R: Read>(reader: &mut R) -> io::Result<u16> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

fn read_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_i32<R: Read>(reader: &mut R) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_diff_exact_bytes() {
        let msg = WireMessage::SectionDiff(SectionDiffMessage {
            section: SectionPos::new(1, -1, 2),
            full_clear: false,
            light_only: true,
            indices: vec![0x0123, 0x0FFF],
        });
        let mut bytes = Vec::new();
        msg.encode(&mut bytes).unwrap();

        #[rustfmt::skip]
        let expected = [
            0u8,                         // tag
            1, 0, 0, 0,                  // x
            0xFF, 0xFF, 0xFF, 0xFF,      // y = -1
            2, 0, 0, 0,                  // z
            0,                           // full_clear
            1,                           // light_only
            2, 0, 0, 0,                  // count
            0x23, 0x01,                  // index 0x0123
            0xFF, 0x0F,                  // index 0x0FFF
        ];
        assert_eq!(bytes, expected);

        let decoded = WireMessage::decode(&mut bytes.as_slice()).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_full_clear_carries_no_indices() {
        let msg = WireMessage::SectionDiff(SectionDiffMessage {
            section: SectionPos::new(0, 4, 0),
            full_clear: true,
            light_only: false,
            indices: Vec::new(),
        });
        let mut bytes = Vec::new();
        msg.encode(&mut bytes).unwrap();
        // tag + 3 coords + 2 flags, no count field
        assert_eq!(bytes.len(), 1 + 12 + 2);
        assert_eq!(WireMessage::decode(&mut bytes.as_slice()).unwrap(), msg);
    }

    #[test]
    fn test_height_map_round_trip() {
        let mut heights = Box::new([63i32; 256]);
        heights[5 + 16 * 5] = -64;
        let msg = WireMessage::HeightMap(HeightMapMessage {
            chunk: ChunkPos::new(-7, 12),
            heights,
        });
        let mut bytes = Vec::new();
        msg.encode(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 1 + 8 + 256 * 4);
        assert_eq!(WireMessage::decode(&mut bytes.as_slice()).unwrap(), msg);
    }

    #[test]
    fn test_unknown_tag_is_invalid_data() {
        let bytes = [9u8, 0, 0, 0];
        let err = WireMessage::decode(&mut bytes.as_slice()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_out_of_range_index_is_invalid_data() {
        let msg = WireMessage::SectionDiff(SectionDiffMessage {
            section: SectionPos::new(0, 0, 0),
            full_clear: false,
            light_only: false,
            indices: vec![0x0FFF],
        });
        let mut bytes = Vec::new();
        msg.encode(&mut bytes).unwrap();
        // Raise the index past the 12-bit voxel range
        let last = bytes.len() - 1;
        bytes[last] = 0x10;
        let err = WireMessage::decode(&mut bytes.as_slice()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_truncated_message_is_eof() {
        let msg = WireMessage::SectionDiff(SectionDiffMessage {
            section: SectionPos::new(1, 2, 3),
            full_clear: false,
            light_only: false,
            indices: vec![1, 2, 3],
        });
        let mut bytes = Vec::new();
        msg.encode(&mut bytes).unwrap();
        bytes.truncate(bytes.len() - 1);
        let err = WireMessage::decode(&mut bytes.as_slice()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
