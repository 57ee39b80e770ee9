//! Shell ray-march carve pass.
//!
//! Rays are fired from the blast origin toward every integer offset on
//! the nominal sphere's surface shell. Each ray carries a travel budget
//! that is drained by step distance and by the scaled resistance of the
//! voxels it passes through; voxels the ray can still afford are marked
//! in the diff accumulator. The grid itself is not mutated here.

use std::collections::HashSet;

use glam::Vec3;
use log::debug;
use rand::Rng;

use crate::destruction::blast::Blast;
use crate::destruction::damage::DamageCalculator;
use crate::destruction::diff::SectionDiffMap;
use crate::math::coords::{SectionPos, VoxelPos};
use crate::world::grid::VoxelGrid;
use crate::world::section::Section;

/// Budget consumed per ray step, in world units.
pub const RAY_STEP: f32 = 0.225;

/// Unscaled budget cost of crossing a cached air-only section.
const EMPTY_SECTION_COST: f32 = 0.3;

/// Carve a blast into the grid, producing the set of removed voxels.
///
/// Pure with respect to the grid: callers apply the returned diffs
/// separately. Sections that are air-only (or not loaded) are cached
/// after first contact and crossed at a flat cost without further grid
/// lookups.
pub fn carve<G, D, R>(grid: &G, blast: &Blast, damage: &D, rng: &mut R) -> SectionDiffMap
where
    G: VoxelGrid + ?Sized,
    D: DamageCalculator + ?Sized,
    R: Rng,
{
    let mut diffs = SectionDiffMap::new();
    if blast.size <= 0 {
        return diffs;
    }

    let limits = grid.limits();
    let scale = blast.scale();
    let spread = 0.6 * blast.spread_factor;
    let size = blast.size;
    let mut empty_sections = HashSet::new();
    let mut rays = 0u32;

    for dx in -size..=size {
        for dy in -size..=size {
            for dz in -size..=size {
                let distance = ((dx * dx + dy * dy + dz * dz) as f64).sqrt();
                if distance as i32 != size || distance == 0.0 {
                    continue;
                }
                rays += 1;

                let direction = Vec3::new(dx as f32, dy as f32, dz as f32) / distance as f32;
                let step = direction * RAY_STEP;
                let mut budget = size as f32 * (0.7 + rng.gen_range(0.0..1.0f32) * spread);
                let mut sample = blast.origin;
                let mut last: Option<VoxelPos> = None;
                let mut cached: Option<(SectionPos, &Section)> = None;

                while budget > 0.0 {
                    sample += step;
                    budget -= RAY_STEP;
                    let voxel = VoxelPos::from_world(sample);
                    if !limits.contains_y(voxel.y) {
                        break;
                    }
                    if last == Some(voxel) {
                        continue;
                    }
                    last = Some(voxel);

                    let section = voxel.section();
                    if empty_sections.contains(&section) {
                        budget -= EMPTY_SECTION_COST * scale;
                        continue;
                    }
                    // Consecutive steps usually stay in one section;
                    // keep the last handle instead of re-resolving it.
                    let stored = match cached {
                        Some((pos, stored)) if pos == section => stored,
                        _ => {
                            let Some(stored) = grid.section(section) else {
                                // Unloaded chunks are crossed like air;
                                // the event is not allowed to force
                                // loads.
                                empty_sections.insert(section);
                                continue;
                            };
                            if stored.is_air_only() {
                                empty_sections.insert(section);
                                continue;
                            }
                            cached = Some((section, stored));
                            stored
                        }
                    };

                    let state = stored.get(voxel.local());
                    if state.is_air() {
                        // Air bits are set too, so passes through a
                        // mostly-carved section can still complete it
                        // to a full clear.
                        diffs.mark(section, voxel.local());
                        continue;
                    }
                    if blast.ignore_fluid_resistance && state.is_fluid() {
                        diffs.mark(section, voxel.local());
                        continue;
                    }
                    let resistance = damage.resistance(state, voxel);
                    budget -= (resistance + 0.3) * scale;
                    if budget > 0.0 && damage.may_remove(state, voxel) {
                        diffs.mark(section, voxel.local());
                    }
                }
            }
        }
    }

    debug!(
        "carve: size={} rays={} sections={} empty-cached={}",
        size,
        rays,
        diffs.len(),
        empty_sections.len()
    );
    diffs
}
