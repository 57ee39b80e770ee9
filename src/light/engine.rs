//! Incremental lighting engine interface.
//!
//! The repair pass computes bulk light corrections itself; everything
//! it cannot settle locally is handed to the host's incremental engine
//! through this trait. `SkyLightStore` is a self-contained
//! implementation backing the in-process grid and the tests.

use std::collections::{HashMap, HashSet};

use crate::light::layer::LightLayer;
use crate::math::coords::{ChunkPos, SectionPos, VoxelPos};

/// Which light field an operation addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightChannel {
    Sky,
    Block,
}

pub trait LightingEngine {
    /// Stored sky-light data for a section, if any.
    fn sky_layer(&self, pos: SectionPos) -> Option<&LightLayer>;

    /// Replace the stored light data of one section wholesale.
    fn queue_section_data(&mut self, channel: LightChannel, pos: SectionPos, data: LightLayer);

    /// Tell the engine whether a section is now empty of blockers.
    fn update_section_status(&mut self, pos: SectionPos, empty: bool);

    fn set_light_enabled(&mut self, chunk: ChunkPos, enabled: bool);

    /// Schedule an incremental re-check of one voxel's light.
    fn check_voxel(&mut self, pos: VoxelPos);
}

/// In-memory lighting engine.
///
/// Stores sky and block layers per section and records the incremental
/// checks that were requested instead of resolving them.
#[derive(Default)]
pub struct SkyLightStore {
    sky: HashMap<SectionPos, LightLayer>,
    block: HashMap<SectionPos, LightLayer>,
    statuses: HashMap<SectionPos, bool>,
    enabled: HashSet<ChunkPos>,
    pending_checks: Vec<VoxelPos>,
}

impl SkyLightStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a section with uniform sky light.
    pub fn seed_sky(&mut self, pos: SectionPos, level: u8) {
        self.sky.insert(pos, LightLayer::filled(level));
    }

    /// Sky light at a voxel; sections without data read as zero.
    pub fn sky_light(&self, pos: VoxelPos) -> u8 {
        self.sky
            .get(&pos.section())
            .map(|layer| layer.get(pos.local()))
            .unwrap_or(0)
    }

    pub fn block_layer(&self, pos: SectionPos) -> Option<&LightLayer> {
        self.block.get(&pos)
    }

    pub fn section_status(&self, pos: SectionPos) -> Option<bool> {
        self.statuses.get(&pos).copied()
    }

    pub fn is_light_enabled(&self, chunk: ChunkPos) -> bool {
        self.enabled.contains(&chunk)
    }

    pub fn pending_checks(&self) -> &[VoxelPos] {
        &self.pending_checks
    }

    pub fn take_pending_checks(&mut self) -> Vec<VoxelPos> {
        std::mem::take(&mut self.pending_checks)
    }
}

impl LightingEngine for SkyLightStore {
    fn sky_layer(&self, pos: SectionPos) -> Option<&LightLayer> {
        self.sky.get(&pos)
    }

    fn queue_section_data(&mut self, channel: LightChannel, pos: SectionPos, data: LightLayer) {
        match channel {
            LightChannel::Sky => self.sky.insert(pos, data),
            LightChannel::Block => self.block.insert(pos, data),
        };
    }

    fn update_section_status(&mut self, pos: SectionPos, empty: bool) {
        self.statuses.insert(pos, empty);
    }

    fn set_light_enabled(&mut self, chunk: ChunkPos, enabled: bool) {
        if enabled {
            self.enabled.insert(chunk);
        } else {
            self.enabled.remove(&chunk);
        }
    }

    fn check_voxel(&mut self, pos: VoxelPos) {
        self.pending_checks.push(pos);
    }
}
