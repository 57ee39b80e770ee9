//! Voxel grid collaborator interface.
//!
//! Destruction and light repair operate against this trait; the host
//! engine owns the storage. The column-heights accessors expose the
//! sky-light source heights directly; hosts whose chunks do not track
//! heights return `None` and height synchronization is skipped for the
//! affected columns.

use crate::core::config::WorldLimits;
use crate::light::heightmap::ColumnHeights;
use crate::math::coords::{ChunkPos, SectionPos, VoxelPos};
use crate::world::section::{Section, VoxelState};

pub trait VoxelGrid {
    fn limits(&self) -> WorldLimits;

    /// Borrow a section; `None` when its chunk is not loaded or the
    /// section is outside the vertical world bounds.
    fn section(&self, pos: SectionPos) -> Option<&Section>;

    fn section_mut(&mut self, pos: SectionPos) -> Option<&mut Section>;

    /// Read a single voxel. Unloaded or out-of-bounds positions read as air.
    fn voxel(&self, pos: VoxelPos) -> VoxelState {
        if !self.limits().contains_y(pos.y) {
            return VoxelState::AIR;
        }
        self.section(pos.section())
            .map(|section| section.get(pos.local()))
            .unwrap_or(VoxelState::AIR)
    }

    /// Remove any auxiliary per-voxel data attached at `pos`.
    fn clear_block_entity(&mut self, pos: VoxelPos);

    /// Flag a section for re-mesh/persistence by the host.
    fn mark_section_dirty(&mut self, pos: SectionPos);

    /// Sky-light source heights for a chunk column, if tracked.
    fn column_heights(&self, chunk: ChunkPos) -> Option<&ColumnHeights>;

    fn column_heights_mut(&mut self, chunk: ChunkPos) -> Option<&mut ColumnHeights>;
}
