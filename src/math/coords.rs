//! Coordinate types for the chunked voxel grid.

use glam::Vec3;

/// Voxels per section (16^3).
pub const SECTION_VOLUME: usize = 4096;

/// World voxel coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VoxelPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Voxel containing a continuous world position.
    ///
    /// Truncates toward zero, matching how ray samples are snapped to
    /// the grid.
    pub fn from_world(pos: Vec3) -> Self {
        Self {
            x: pos.x as i32,
            y: pos.y as i32,
            z: pos.z as i32,
        }
    }

    /// Section containing this voxel (floor division by 16 per axis).
    pub fn section(self) -> SectionPos {
        SectionPos {
            x: self.x >> 4,
            y: self.y >> 4,
            z: self.z >> 4,
        }
    }

    /// Packed position of this voxel within its section.
    pub fn local(self) -> LocalIndex {
        LocalIndex::pack(
            (self.x & 15) as u8,
            (self.y & 15) as u8,
            (self.z & 15) as u8,
        )
    }

    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }
}

/// Section coordinate: voxel coordinate divided by 16 on each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SectionPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl SectionPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Section at height `section_y` within a chunk column.
    pub fn of(chunk: ChunkPos, section_y: i32) -> Self {
        Self {
            x: chunk.x,
            y: section_y,
            z: chunk.z,
        }
    }

    /// Chunk column this section belongs to.
    pub fn chunk(self) -> ChunkPos {
        ChunkPos {
            x: self.x,
            z: self.z,
        }
    }

    /// Voxel coordinate of this section's minimum corner.
    pub fn origin(self) -> VoxelPos {
        VoxelPos {
            x: self.x << 4,
            y: self.y << 4,
            z: self.z << 4,
        }
    }

    /// World voxel coordinate of a local index within this section.
    pub fn voxel_at(self, local: LocalIndex) -> VoxelPos {
        let (x, y, z) = local.unpack();
        VoxelPos {
            x: (self.x << 4) + x as i32,
            y: (self.y << 4) + y as i32,
            z: (self.z << 4) + z as i32,
        }
    }
}

/// Chunk column coordinate: a vertical stack of sections sharing (x, z).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }
}

/// 12-bit packed local coordinate within a section:
/// `(x << 8) | (y << 4) | z`, each axis in `[0, 16)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalIndex(u16);

impl LocalIndex {
    pub fn pack(x: u8, y: u8, z: u8) -> Self {
        debug_assert!(x < 16 && y < 16 && z < 16);
        Self(((x as u16) << 8) | ((y as u16) << 4) | z as u16)
    }

    /// Reinterpret a raw 16-bit value; only the low 12 bits are kept.
    pub fn from_raw(raw: u16) -> Self {
        Self(raw & 0x0FFF)
    }

    pub fn raw(self) -> u16 {
        self.0
    }

    pub fn x(self) -> u8 {
        ((self.0 >> 8) & 15) as u8
    }

    pub fn y(self) -> u8 {
        ((self.0 >> 4) & 15) as u8
    }

    pub fn z(self) -> u8 {
        (self.0 & 15) as u8
    }

    pub fn unpack(self) -> (u8, u8, u8) {
        (self.x(), self.y(), self.z())
    }

    /// Position in a flat 4096-slot section array.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Every local index of a section, in packed order.
    pub fn all() -> impl Iterator<Item = LocalIndex> {
        (0..SECTION_VOLUME as u16).map(LocalIndex)
    }
}

/// Index into per-column 256-entry arrays: `x + 16 * z`.
pub fn column_index(x: u8, z: u8) -> usize {
    debug_assert!(x < 16 && z < 16);
    x as usize + 16 * z as usize
}
