//! In-memory voxel grid host.
//!
//! A complete `VoxelGrid` implementation backed by hash-mapped chunk
//! columns. Used by the tests, the benchmarks, and the demo binary; a
//! real engine would put its own chunk storage behind the same trait.

use std::collections::HashMap;

use crate::core::config::WorldLimits;
use crate::light::heightmap::ColumnHeights;
use crate::math::coords::{ChunkPos, SectionPos, VoxelPos};
use crate::world::grid::VoxelGrid;
use crate::world::section::{Section, VoxelState};

/// A vertical stack of sections plus the column's light bookkeeping.
pub struct ChunkColumn {
    sections: Vec<Section>,
    heights: ColumnHeights,
}

impl ChunkColumn {
    fn new(limits: WorldLimits) -> Self {
        let count = (limits.max_section() - limits.min_section() + 1) as usize;
        Self {
            sections: (0..count).map(|_| Section::empty()).collect(),
            heights: ColumnHeights::new(limits.min_y - 1),
        }
    }
}

/// Hash-mapped chunk store implementing the grid collaborator.
pub struct MemoryGrid {
    limits: WorldLimits,
    chunks: HashMap<ChunkPos, ChunkColumn>,
    dirty_sections: Vec<SectionPos>,
    cleared_entities: Vec<VoxelPos>,
}

impl MemoryGrid {
    pub fn new(limits: WorldLimits) -> Self {
        Self {
            limits,
            chunks: HashMap::new(),
            dirty_sections: Vec::new(),
            cleared_entities: Vec::new(),
        }
    }

    /// Load (allocate) a chunk column of all air.
    pub fn insert_chunk(&mut self, chunk: ChunkPos) {
        self.chunks
            .entry(chunk)
            .or_insert_with(|| ChunkColumn::new(self.limits));
    }

    pub fn is_loaded(&self, chunk: ChunkPos) -> bool {
        self.chunks.contains_key(&chunk)
    }

    fn section_index(&self, section_y: i32) -> Option<usize> {
        if self.limits.contains_section(section_y) {
            Some((section_y - self.limits.min_section()) as usize)
        } else {
            None
        }
    }

    /// Store a voxel, allocating the containing chunk if needed.
    /// Out-of-bounds heights are ignored. Placing an opaque voxel above
    /// the column's recorded blocker raises the height entry.
    pub fn set_voxel(&mut self, pos: VoxelPos, state: VoxelState) {
        if !self.limits.contains_y(pos.y) {
            return;
        }
        let section_pos = pos.section();
        let index = match self.section_index(section_pos.y) {
            Some(index) => index,
            None => return,
        };
        let limits = self.limits;
        let column = self
            .chunks
            .entry(section_pos.chunk())
            .or_insert_with(|| ChunkColumn::new(limits));
        column.sections[index].set(pos.local(), state);
        if state.light_block() > 0 {
            column
                .heights
                .raise_to((pos.x & 15) as u8, (pos.z & 15) as u8, pos.y);
        }
    }

    /// Fill an inclusive box of voxels with one state.
    pub fn fill(&mut self, min: VoxelPos, max: VoxelPos, state: VoxelState) {
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                for x in min.x..=max.x {
                    self.set_voxel(VoxelPos::new(x, y, z), state);
                }
            }
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn loaded_chunks(&self) -> impl Iterator<Item = &ChunkPos> {
        self.chunks.keys()
    }

    /// Take the sections flagged dirty since the last call.
    pub fn take_dirty_sections(&mut self) -> Vec<SectionPos> {
        std::mem::take(&mut self.dirty_sections)
    }

    /// Positions whose block entities were cleared, in clearing order.
    pub fn cleared_entities(&self) -> &[VoxelPos] {
        &self.cleared_entities
    }
}

impl VoxelGrid for MemoryGrid {
    fn limits(&self) -> WorldLimits {
        self.limits
    }

    fn section(&self, pos: SectionPos) -> Option<&Section> {
        let index = self.section_index(pos.y)?;
        self.chunks.get(&pos.chunk()).map(|c| &c.sections[index])
    }

    fn section_mut(&mut self, pos: SectionPos) -> Option<&mut Section> {
        let index = self.section_index(pos.y)?;
        self.chunks
            .get_mut(&pos.chunk())
            .map(|c| &mut c.sections[index])
    }

    fn clear_block_entity(&mut self, pos: VoxelPos) {
        self.cleared_entities.push(pos);
    }

    fn mark_section_dirty(&mut self, pos: SectionPos) {
        if !self.dirty_sections.contains(&pos) {
            self.dirty_sections.push(pos);
        }
    }

    fn column_heights(&self, chunk: ChunkPos) -> Option<&ColumnHeights> {
        self.chunks.get(&chunk).map(|c| &c.heights)
    }

    fn column_heights_mut(&mut self, chunk: ChunkPos) -> Option<&mut ColumnHeights> {
        self.chunks.get_mut(&chunk).map(|c| &mut c.heights)
    }
}
