//! Mathematical utilities and coordinate types

pub mod coords;

pub use coords::{ChunkPos, LocalIndex, SECTION_VOLUME, SectionPos, VoxelPos, column_index};
