//! Bulk application of accumulated diffs to the grid.
//!
//! Clears voxels directly through section storage rather than issuing
//! per-voxel world edits, then records which light sections of which
//! chunk columns were touched so the repair pass knows where to look.

use std::collections::HashMap;

use bitvec::prelude::*;
use log::debug;

use crate::core::config::WorldLimits;
use crate::destruction::diff::{SectionDiff, SectionDiffMap};
use crate::math::coords::{ChunkPos, LocalIndex, SectionPos, VoxelPos};
use crate::world::grid::VoxelGrid;
use crate::world::section::VoxelState;

/// Which light sections of one chunk column were touched, indexed by
/// light-section index (block sections plus one padding section below
/// and above).
#[derive(Clone, Debug)]
pub struct ChunkSectionMask {
    bits: BitVec,
}

impl ChunkSectionMask {
    pub fn new(limits: WorldLimits) -> Self {
        Self {
            bits: BitVec::repeat(false, limits.light_section_count()),
        }
    }

    pub fn set(&mut self, index: usize) {
        self.bits.set(index, true);
    }

    pub fn clear(&mut self, index: usize) {
        self.bits.set(index, false);
    }

    pub fn get(&self, index: usize) -> bool {
        self.bits[index]
    }

    /// Highest set light-section index, if any bit is set.
    pub fn highest(&self) -> Option<usize> {
        self.bits.last_one()
    }
}

/// Result of applying one event's diffs to the grid.
///
/// Carries the drained diffs onward for light repair and replication,
/// plus the per-chunk touched-section masks the repair pass consumes.
pub struct AppliedDiffs {
    /// Applied diffs in accumulation order. Diffs whose section was not
    /// loaded at apply time are dropped, not retained.
    pub diffs: Vec<(SectionPos, SectionDiff)>,
    masks: HashMap<ChunkPos, ChunkSectionMask>,
    chunk_order: Vec<ChunkPos>,
    /// Non-air voxels actually cleared.
    pub voxels_cleared: u64,
}

impl AppliedDiffs {
    /// Touched chunk columns, in first-touch order.
    pub fn chunks(&self) -> impl Iterator<Item = ChunkPos> + '_ {
        self.chunk_order.iter().copied()
    }

    pub fn mask(&self, chunk: ChunkPos) -> Option<&ChunkSectionMask> {
        self.masks.get(&chunk)
    }

    pub fn mask_mut(&mut self, chunk: ChunkPos) -> Option<&mut ChunkSectionMask> {
        self.masks.get_mut(&chunk)
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }
}

/// Clear every voxel the accumulator marked.
///
/// Sections that are unloaded (or outside the vertical bounds) are
/// skipped without failing the event. Block-entity cleanup and dirty
/// marking go through the grid so the host sees both.
pub fn apply<G>(grid: &mut G, mut diffs: SectionDiffMap) -> AppliedDiffs
where
    G: VoxelGrid + ?Sized,
{
    let limits = grid.limits();
    let mut applied = AppliedDiffs {
        diffs: Vec::new(),
        masks: HashMap::new(),
        chunk_order: Vec::new(),
        voxels_cleared: 0,
    };

    for (pos, diff) in diffs.drain() {
        if !limits.contains_section(pos.y) {
            debug!("apply: section {:?} outside world bounds, skipped", pos);
            continue;
        }

        let mut entity_positions: Vec<VoxelPos> = Vec::new();
        let mut cleared = 0u64;
        {
            let Some(section) = grid.section_mut(pos) else {
                debug!("apply: section {:?} not loaded, skipped", pos);
                continue;
            };
            let mut clear_one = |local: LocalIndex| {
                let prev = section.set(local, VoxelState::AIR);
                if !prev.is_air() {
                    cleared += 1;
                    if prev.has_block_entity() {
                        entity_positions.push(pos.voxel_at(local));
                    }
                }
            };
            match &diff {
                SectionDiff::FullClear => {
                    for local in LocalIndex::all() {
                        clear_one(local);
                    }
                }
                SectionDiff::Partial(bits) => {
                    for local in bits.indices() {
                        clear_one(local);
                    }
                }
            }
        }
        for voxel in entity_positions {
            grid.clear_block_entity(voxel);
        }
        grid.mark_section_dirty(pos);

        applied.voxels_cleared += cleared;
        let chunk = pos.chunk();
        let chunk_order = &mut applied.chunk_order;
        let mask = applied.masks.entry(chunk).or_insert_with(|| {
            chunk_order.push(chunk);
            ChunkSectionMask::new(limits)
        });
        mask.set(limits.light_section_index(pos.y));
        applied.diffs.push((pos, diff));
    }

    debug!(
        "apply: {} sections over {} chunks, {} voxels cleared",
        applied.diffs.len(),
        applied.chunk_order.len(),
        applied.voxels_cleared
    );
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::mem::MemoryGrid;
    use crate::world::section::flags;

    fn limits() -> WorldLimits {
        WorldLimits::new(-64, 320)
    }

    #[test]
    fn test_partial_clears_only_marked_voxels() {
        let mut grid = MemoryGrid::new(limits());
        grid.fill(
            VoxelPos::new(0, 0, 0),
            VoxelPos::new(15, 15, 15),
            VoxelState::solid(1),
        );
        let mut diffs = SectionDiffMap::new();
        let section = SectionPos::new(0, 0, 0);
        diffs.mark(section, LocalIndex::pack(1, 1, 1));
        diffs.mark(section, LocalIndex::pack(2, 2, 2));

        let applied = apply(&mut grid, diffs);
        assert_eq!(applied.voxels_cleared, 2);
        assert!(grid.voxel(VoxelPos::new(1, 1, 1)).is_air());
        assert!(grid.voxel(VoxelPos::new(2, 2, 2)).is_air());
        assert!(!grid.voxel(VoxelPos::new(3, 3, 3)).is_air());
    }

    #[test]
    fn test_full_clear_empties_section() {
        let mut grid = MemoryGrid::new(limits());
        grid.fill(
            VoxelPos::new(0, 0, 0),
            VoxelPos::new(15, 15, 15),
            VoxelState::solid(1),
        );
        let mut diffs = SectionDiffMap::new();
        let section = SectionPos::new(0, 0, 0);
        for local in LocalIndex::all() {
            diffs.mark(section, local);
        }

        let applied = apply(&mut grid, diffs);
        assert_eq!(applied.voxels_cleared, 4096);
        assert!(grid.section(section).unwrap().is_air_only());
        assert!(matches!(applied.diffs[0].1, SectionDiff::FullClear));
    }

    #[test]
    fn test_unloaded_section_is_skipped() {
        let mut grid = MemoryGrid::new(limits());
        grid.fill(
            VoxelPos::new(0, 0, 0),
            VoxelPos::new(15, 15, 15),
            VoxelState::solid(1),
        );
        let mut diffs = SectionDiffMap::new();
        diffs.mark(SectionPos::new(0, 0, 0), LocalIndex::pack(0, 0, 0));
        diffs.mark(SectionPos::new(40, 0, 40), LocalIndex::pack(0, 0, 0));

        let applied = apply(&mut grid, diffs);
        assert_eq!(applied.diffs.len(), 1);
        assert_eq!(applied.voxels_cleared, 1);
        assert_eq!(applied.chunks().count(), 1);
    }

    #[test]
    fn test_block_entities_are_cleared() {
        let mut grid = MemoryGrid::new(limits());
        let chest = VoxelState::solid(20).with_flags(flags::BLOCK_ENTITY);
        grid.set_voxel(VoxelPos::new(4, 4, 4), chest);

        let mut diffs = SectionDiffMap::new();
        diffs.mark(SectionPos::new(0, 0, 0), LocalIndex::pack(4, 4, 4));

        let _ = apply(&mut grid, diffs);
        assert_eq!(grid.cleared_entities(), &[VoxelPos::new(4, 4, 4)]);
    }

    #[test]
    fn test_masks_track_touched_light_sections() {
        let lim = limits();
        let mut grid = MemoryGrid::new(lim);
        grid.fill(
            VoxelPos::new(0, 0, 0),
            VoxelPos::new(15, 47, 15),
            VoxelState::solid(1),
        );
        let mut diffs = SectionDiffMap::new();
        diffs.mark(SectionPos::new(0, 0, 0), LocalIndex::pack(0, 0, 0));
        diffs.mark(SectionPos::new(0, 2, 0), LocalIndex::pack(0, 0, 0));

        let applied = apply(&mut grid, diffs);
        let mask = applied.mask(ChunkPos::new(0, 0)).unwrap();
        assert!(mask.get(lim.light_section_index(0)));
        assert!(!mask.get(lim.light_section_index(1)));
        assert!(mask.get(lim.light_section_index(2)));
        assert_eq!(mask.highest(), Some(lim.light_section_index(2)));
    }

    #[test]
    fn test_dirty_sections_reported_to_grid() {
        let mut grid = MemoryGrid::new(limits());
        grid.fill(
            VoxelPos::new(0, 0, 0),
            VoxelPos::new(15, 15, 15),
            VoxelState::solid(1),
        );
        let mut diffs = SectionDiffMap::new();
        diffs.mark(SectionPos::new(0, 0, 0), LocalIndex::pack(0, 0, 0));

        let _ = apply(&mut grid, diffs);
        assert_eq!(grid.take_dirty_sections(), vec![SectionPos::new(0, 0, 0)]);
    }
}
