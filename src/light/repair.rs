//! Two-phase light repair after bulk destruction.
//!
//! Phase A settles direct sky exposure: sections above the terrain are
//! reset to fully lit wholesale, and the per-column source heights are
//! walked downward to their new blockers. Phase B then sweeps the
//! exposed shafts and hands every sideways-reachable voxel to the
//! incremental engine. Phase A must finish for a column before Phase B
//! reads it, because propagation keys off the finalized heights.

use log::warn;

use crate::destruction::apply::AppliedDiffs;
use crate::destruction::diff::{SectionDiff, SectionDiffMap};
use crate::light::engine::{LightChannel, LightingEngine};
use crate::light::heightmap::ColumnHeights;
use crate::light::layer::LightLayer;
use crate::math::coords::{ChunkPos, LocalIndex, SectionPos, VoxelPos};
use crate::world::grid::VoxelGrid;

/// Phase A: recompute direct sky light and column heights.
///
/// Walks each touched column top-down. Every empty section from the top
/// of the light grid downward is the "open sky" region: touched
/// sections there are reset to full sky light and zero block light in
/// one store. The first non-empty section bounds that region; touched
/// sections below it only get their block light cleared. Heights are
/// then clamped under the boundary and lowered per (x, z) as long as
/// newly exposed transparent voxels keep appearing.
///
/// Returns the updated heights per chunk, in chunk-touch order, for
/// replication. Mask bits consumed by the open-sky reset are cleared in
/// `applied` so Phase B does not rescan them.
pub fn repair_direct_sky_light<G, L>(
    grid: &mut G,
    engine: &mut L,
    applied: &mut AppliedDiffs,
) -> Vec<(ChunkPos, ColumnHeights)>
where
    G: VoxelGrid + ?Sized,
    L: LightingEngine + ?Sized,
{
    let limits = grid.limits();
    let chunks: Vec<ChunkPos> = applied.chunks().collect();
    let mut updated = Vec::new();

    for chunk in chunks {
        let Some(stored_heights) = grid.column_heights(chunk) else {
            warn!("light repair: chunk {:?} tracks no heights, skipped", chunk);
            continue;
        };
        let mut heights = stored_heights.clone();
        let Some(mask) = applied.mask_mut(chunk) else {
            continue;
        };

        // Top-down scan for the lowest empty section above the terrain.
        // The padding sections at both ends of the light grid always
        // count as empty.
        let mut boundary_y = limits.max_light_section();
        for section_y in (limits.min_light_section()..=limits.max_light_section()).rev() {
            let pos = SectionPos::of(chunk, section_y);
            let empty = section_y == limits.max_light_section()
                || section_y == limits.min_light_section()
                || grid.section(pos).is_none_or(|s| s.is_air_only());
            if empty {
                boundary_y = section_y;
                let index = limits.light_section_index(section_y);
                if mask.get(index) {
                    mask.clear(index);
                    engine.queue_section_data(LightChannel::Sky, pos, LightLayer::full());
                    engine.queue_section_data(LightChannel::Block, pos, LightLayer::dark());
                    engine.update_section_status(pos, true);
                }
            } else {
                // Below the terrain surface sky light is untouched, but
                // carved sections still shed their block light.
                for index in (0..limits.light_section_index(boundary_y)).rev() {
                    if mask.get(index) {
                        let below = SectionPos::of(chunk, limits.section_from_light_index(index));
                        engine.queue_section_data(LightChannel::Block, below, LightLayer::dark());
                        engine.update_section_status(below, true);
                    }
                }
                break;
            }
        }

        // No blocker can survive inside or above the open-sky region.
        heights.clamp_above((boundary_y << 4) - 1);

        // Descend below the boundary, lowering each column's height
        // while its recorded blocker turns out transparent. A deeper
        // section is only visited when some column was still
        // unresolved at the bottom row of the current one.
        let mut continue_below = true;
        for section_y in (limits.min_light_section()..boundary_y).rev() {
            if !continue_below {
                break;
            }
            continue_below = false;

            if !limits.contains_section(section_y) {
                continue;
            }
            let pos = SectionPos::of(chunk, section_y);
            let Some(section) = grid.section(pos) else {
                continue;
            };
            let Some(layer) = engine.sky_layer(pos) else {
                continue;
            };
            let mut layer = layer.clone();
            let mut changed = false;

            for x in 0..16u8 {
                for z in 0..16u8 {
                    for y in (0..16u8).rev() {
                        let h = heights.get(x, z);
                        let y_world = (section_y << 4) + y as i32;
                        if y_world > h + 1 {
                            if y == 0 {
                                continue_below = true;
                            }
                            continue;
                        }
                        let local = LocalIndex::pack(x, y, z);
                        if y_world == h && section.get(local).light_block() == 0 {
                            layer.set(local, 15);
                            heights.set(x, z, y_world - 1);
                            changed = true;
                            if y == 0 {
                                continue_below = true;
                            }
                        }
                    }
                }
            }

            if changed {
                engine.queue_section_data(LightChannel::Sky, pos, layer);
                engine.update_section_status(pos, false);
            }
        }

        engine.set_light_enabled(chunk, true);

        if let Some(stored) = grid.column_heights_mut(chunk) {
            *stored = heights.clone();
        }
        updated.push((chunk, heights));
    }

    updated
}

/// Phase B: queue indirect propagation at the walls of exposed shafts.
///
/// For every touched column, walks from the top touched section down to
/// the column's light source and tests the four horizontal neighbors.
/// A neighbor that admits light but has not reached full brightness is
/// handed to the incremental engine and recorded in the returned
/// light-only diff set. Neighbor positions crossing a chunk border
/// address the neighboring chunk directly through world coordinates.
pub fn propagate_indirect_light<G, L>(
    grid: &G,
    engine: &mut L,
    applied: &AppliedDiffs,
) -> SectionDiffMap
where
    G: VoxelGrid + ?Sized,
    L: LightingEngine + ?Sized,
{
    let limits = grid.limits();
    let mut queued = SectionDiffMap::new();

    for chunk in applied.chunks() {
        let Some(heights) = grid.column_heights(chunk) else {
            continue;
        };
        let Some(mask) = applied.mask(chunk) else {
            continue;
        };
        let top_section = limits.section_from_light_index(mask.highest().unwrap_or(0));
        let top_y = (top_section << 4) + 15;

        for x in 0..16u8 {
            for z in 0..16u8 {
                let floor = (heights.get(x, z) + 1).max(limits.min_y);
                let world_x = (chunk.x << 4) + x as i32;
                let world_z = (chunk.z << 4) + z as i32;
                for y in (floor..=top_y).rev() {
                    for (dx, dz) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
                        let neighbor = VoxelPos::new(world_x + dx, y, world_z + dz);
                        if grid.voxel(neighbor).light_block() < 15
                            && sky_light_at(engine, neighbor) < 15
                        {
                            queued.mark(neighbor.section(), neighbor.local());
                        }
                    }
                }
            }
        }
    }

    for pos in queued.sections().collect::<Vec<_>>() {
        if let Some(diff) = queued.get(pos) {
            match diff {
                SectionDiff::Partial(bits) => {
                    for local in bits.indices().collect::<Vec<_>>() {
                        engine.check_voxel(pos.voxel_at(local));
                    }
                }
                SectionDiff::FullClear => {
                    for local in LocalIndex::all() {
                        engine.check_voxel(pos.voxel_at(local));
                    }
                }
            }
        }
        engine.update_section_status(pos, false);
        engine.set_light_enabled(pos.chunk(), true);
    }

    queued
}

fn sky_light_at<L>(engine: &L, pos: VoxelPos) -> u8
where
    L: LightingEngine + ?Sized,
{
    engine
        .sky_layer(pos.section())
        .map(|layer| layer.get(pos.local()))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::WorldLimits;
    use crate::destruction::apply::apply;
    use crate::destruction::diff::SectionDiffMap;
    use crate::light::engine::SkyLightStore;
    use crate::world::mem::MemoryGrid;
    use crate::world::section::VoxelState;

    const LIMITS: WorldLimits = WorldLimits {
        min_y: -64,
        max_y: 320,
    };

    /// Flat solid terrain up to and including y = 70 in chunk (0, 0),
    /// light seeded so everything strictly above 70 is fully lit.
    fn terrain() -> (MemoryGrid, SkyLightStore) {
        let mut grid = MemoryGrid::new(LIMITS);
        grid.fill(
            VoxelPos::new(0, 0, 0),
            VoxelPos::new(15, 70, 15),
            VoxelState::solid(1),
        );

        let mut engine = SkyLightStore::new();
        for section_y in LIMITS.min_light_section()..=LIMITS.max_light_section() {
            let pos = SectionPos::new(0, section_y, 0);
            if section_y > 4 {
                engine.seed_sky(pos, 15);
            } else if section_y == 4 {
                // Section 4 spans y 64..80: lit above the surface only
                let mut layer = LightLayer::dark();
                for local in LocalIndex::all() {
                    if (section_y << 4) + local.y() as i32 > 70 {
                        layer.set(local, 15);
                    }
                }
                engine.queue_section_data(LightChannel::Sky, pos, layer);
            } else {
                engine.seed_sky(pos, 0);
            }
        }
        // Neighboring chunks read fully lit so border columns do not
        // queue spurious propagation into the void.
        for (cx, cz) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            for section_y in LIMITS.min_light_section()..=LIMITS.max_light_section() {
                engine.seed_sky(SectionPos::new(cx, section_y, cz), 15);
            }
        }
        (grid, engine)
    }

    #[test]
    fn test_full_section_clear_resets_sky_and_clamps_heights() {
        let (mut grid, mut engine) = terrain();
        assert_eq!(grid.column_heights(ChunkPos::new(0, 0)).unwrap().get(3, 3), 70);

        let mut diffs = SectionDiffMap::new();
        let section = SectionPos::new(0, 4, 0);
        for local in LocalIndex::all() {
            diffs.mark(section, local);
        }
        let mut applied = apply(&mut grid, diffs);

        let updated = repair_direct_sky_light(&mut grid, &mut engine, &mut applied);
        assert_eq!(updated.len(), 1);
        let (chunk, heights) = &updated[0];
        assert_eq!(*chunk, ChunkPos::new(0, 0));

        // Every column's surface dropped to the top of section 3.
        for x in 0..16u8 {
            for z in 0..16u8 {
                assert_eq!(heights.get(x, z), 63);
            }
        }
        assert_eq!(grid.column_heights(ChunkPos::new(0, 0)).unwrap().get(0, 0), 63);

        // The emptied section reads fully lit and is flagged empty.
        assert_eq!(engine.sky_light(VoxelPos::new(8, 64, 8)), 15);
        assert_eq!(engine.section_status(section), Some(true));
        assert!(engine.is_light_enabled(ChunkPos::new(0, 0)));

        // Its mask bit was consumed.
        let mask = applied.mask(ChunkPos::new(0, 0)).unwrap();
        assert!(!mask.get(LIMITS.light_section_index(4)));
    }

    fn carve_shaft(grid: &mut MemoryGrid) -> AppliedDiffs {
        // A 1x1 shaft at (5, z=5) from the surface down to y = 60.
        let mut diffs = SectionDiffMap::new();
        for y in 60..=70i32 {
            let pos = VoxelPos::new(5, y, 5);
            diffs.mark(pos.section(), pos.local());
        }
        apply(grid, diffs)
    }

    #[test]
    fn test_shaft_lowers_one_column_and_lights_it() {
        let (mut grid, mut engine) = terrain();
        let mut applied = carve_shaft(&mut grid);

        let updated = repair_direct_sky_light(&mut grid, &mut engine, &mut applied);
        let heights = &updated[0].1;

        // Only the shaft column descends; it stops at the solid floor.
        assert_eq!(heights.get(5, 5), 59);
        assert_eq!(heights.get(6, 5), 70);

        // The shaft interior is directly lit, the floor and walls not.
        assert_eq!(engine.sky_light(VoxelPos::new(5, 70, 5)), 15);
        assert_eq!(engine.sky_light(VoxelPos::new(5, 60, 5)), 15);
        assert_eq!(engine.sky_light(VoxelPos::new(5, 59, 5)), 0);
        assert_eq!(engine.sky_light(VoxelPos::new(6, 65, 5)), 0);
    }

    #[test]
    fn test_indirect_queues_adjacent_pocket() {
        let (mut grid, mut engine) = terrain();
        // Air pocket in the wall next to the shaft, left dark.
        grid.set_voxel(VoxelPos::new(6, 65, 5), VoxelState::AIR);
        let mut applied = carve_shaft(&mut grid);
        let _ = repair_direct_sky_light(&mut grid, &mut engine, &mut applied);

        let queued = propagate_indirect_light(&grid, &mut engine, &applied);

        let pocket = VoxelPos::new(6, 65, 5);
        match queued.get(pocket.section()).unwrap() {
            SectionDiff::Partial(bits) => assert!(bits.contains(pocket.local())),
            SectionDiff::FullClear => unreachable!(),
        }
        assert!(engine.pending_checks().contains(&pocket));
        assert_eq!(engine.section_status(pocket.section()), Some(false));
    }

    #[test]
    fn test_indirect_skips_solid_and_lit_neighbors() {
        let (mut grid, mut engine) = terrain();
        let mut applied = carve_shaft(&mut grid);
        let _ = repair_direct_sky_light(&mut grid, &mut engine, &mut applied);

        let queued = propagate_indirect_light(&grid, &mut engine, &applied);

        // Shaft walls are solid and the air above the terrain is
        // already at full light, so nothing needs the engine.
        assert!(queued.is_empty());
        assert!(engine.pending_checks().is_empty());
    }

    #[test]
    fn test_indirect_crosses_chunk_border() {
        let (mut grid, mut engine) = terrain();
        // Neighboring chunk with a dark air pocket at its border.
        grid.fill(
            VoxelPos::new(-16, 0, 0),
            VoxelPos::new(-1, 70, 15),
            VoxelState::solid(1),
        );
        grid.set_voxel(VoxelPos::new(-1, 65, 5), VoxelState::AIR);
        for section_y in LIMITS.min_light_section()..=LIMITS.max_light_section() {
            engine.seed_sky(SectionPos::new(-1, section_y, 0), if section_y > 4 { 15 } else { 0 });
        }

        // Shaft on the border column x = 0.
        let mut diffs = SectionDiffMap::new();
        for y in 60..=70i32 {
            let pos = VoxelPos::new(0, y, 5);
            diffs.mark(pos.section(), pos.local());
        }
        let mut applied = apply(&mut grid, diffs);
        let _ = repair_direct_sky_light(&mut grid, &mut engine, &mut applied);

        let queued = propagate_indirect_light(&grid, &mut engine, &applied);

        let pocket = VoxelPos::new(-1, 65, 5);
        assert_eq!(pocket.section(), SectionPos::new(-1, 4, 0));
        match queued.get(pocket.section()).unwrap() {
            SectionDiff::Partial(bits) => assert!(bits.contains(pocket.local())),
            SectionDiff::FullClear => unreachable!(),
        }
        assert!(engine.is_light_enabled(ChunkPos::new(-1, 0)));
    }
}
