//! One destructive event, start to finish.
//!
//! Runs the full pipeline synchronously within the caller's simulation
//! step: carve rays, apply the accumulated diffs to the grid, repair
//! direct then indirect light, and produce the replication batch.

use log::info;
use rand::Rng;

use crate::destruction::blast::Blast;
use crate::destruction::damage::DamageCalculator;
use crate::destruction::{apply, carve};
use crate::light::engine::LightingEngine;
use crate::light::heightmap::ColumnHeights;
use crate::light::{propagate_indirect_light, repair_direct_sky_light};
use crate::math::coords::ChunkPos;
use crate::net::replication::drain_event;
use crate::net::protocol::WireMessage;
use crate::world::grid::VoxelGrid;

/// What one event did, plus the batch to send to remote views.
pub struct EventReport {
    /// Non-air voxels removed from the grid.
    pub voxels_cleared: u64,
    /// Sections whose contents changed.
    pub sections_changed: usize,
    /// Chunk columns touched by destruction.
    pub chunks_touched: usize,
    /// Sections that received light-only updates.
    pub light_sections: usize,
    /// Updated column heights, in chunk-touch order.
    pub heights: Vec<(ChunkPos, ColumnHeights)>,
    /// Replication batch in delivery order.
    pub messages: Vec<WireMessage>,
}

/// Execute a blast against the grid and repair the light field.
///
/// Partial completion is an accepted outcome: sections that are not
/// loaded when the diffs land are skipped and the event continues.
pub fn execute_blast<G, L, D, R>(
    grid: &mut G,
    engine: &mut L,
    blast: &Blast,
    damage: &D,
    rng: &mut R,
) -> EventReport
where
    G: VoxelGrid + ?Sized,
    L: LightingEngine + ?Sized,
    D: DamageCalculator + ?Sized,
    R: Rng,
{
    let diffs = carve(grid, blast, damage, rng);
    let mut applied = apply(grid, diffs);
    let heights = repair_direct_sky_light(grid, engine, &mut applied);
    let light = propagate_indirect_light(grid, engine, &applied);
    let light_sections = light.len();
    let messages = drain_event(&applied, &heights, light);

    let report = EventReport {
        voxels_cleared: applied.voxels_cleared,
        sections_changed: applied.diffs.len(),
        chunks_touched: applied.chunks().count(),
        light_sections,
        heights,
        messages,
    };
    info!(
        "blast size={} at {:?}: {} voxels cleared across {} sections / {} chunks, {} light sections, {} messages",
        blast.size,
        blast.origin,
        report.voxels_cleared,
        report.sections_changed,
        report.chunks_touched,
        report.light_sections,
        report.messages.len()
    );
    report
}
