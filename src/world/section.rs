//! Voxel state and 16³ section storage.

use bytemuck::{Pod, Zeroable};

use crate::math::coords::{LocalIndex, SECTION_VOLUME};

/// Voxel flags
pub mod flags {
    /// Voxel is a fluid; strong blasts may bypass its resistance.
    pub const FLUID: u8 = 1 << 0;
    /// Voxel has auxiliary per-voxel data attached.
    pub const BLOCK_ENTITY: u8 = 1 << 1;
}

/// Single voxel state - exactly 4 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct VoxelState {
    /// Material ID (index into the host's material table)
    pub material: u16,
    /// Light-blocking value, 0 (transparent) to 15 (opaque)
    pub opacity: u8,
    /// Flags (fluid, block entity)
    pub flags: u8,
}

impl VoxelState {
    /// Empty/air voxel
    pub const AIR: VoxelState = VoxelState {
        material: 0,
        opacity: 0,
        flags: 0,
    };

    /// Fully opaque voxel of the given material.
    pub fn solid(material: u16) -> Self {
        Self {
            material,
            opacity: 15,
            flags: 0,
        }
    }

    /// Fluid voxel of the given material (blocks one light level).
    pub fn fluid(material: u16) -> Self {
        Self {
            material,
            opacity: 1,
            flags: flags::FLUID,
        }
    }

    /// Create a copy of this voxel with the given opacity.
    pub fn with_opacity(self, opacity: u8) -> Self {
        Self { opacity, ..self }
    }

    /// Create a copy of this voxel with the given flags value.
    pub fn with_flags(self, flags: u8) -> Self {
        Self { flags, ..self }
    }

    pub fn is_air(&self) -> bool {
        *self == Self::AIR
    }

    pub fn is_fluid(&self) -> bool {
        self.flags & flags::FLUID != 0
    }

    pub fn has_block_entity(&self) -> bool {
        self.flags & flags::BLOCK_ENTITY != 0
    }

    /// How much this voxel blocks light (0-15).
    pub fn light_block(&self) -> u8 {
        self.opacity
    }
}

/// A 16×16×16 block of voxel storage.
///
/// Keeps a running non-air count so `is_air_only` stays O(1); callers
/// never need an explicit recount pass after bulk edits.
pub struct Section {
    states: Box<[VoxelState; SECTION_VOLUME]>,
    non_air: u32,
}

impl Section {
    /// Create a section of all air.
    pub fn empty() -> Self {
        Self {
            states: Box::new([VoxelState::AIR; SECTION_VOLUME]),
            non_air: 0,
        }
    }

    /// Create a section filled with a single state.
    pub fn filled(state: VoxelState) -> Self {
        let non_air = if state.is_air() {
            0
        } else {
            SECTION_VOLUME as u32
        };
        Self {
            states: Box::new([state; SECTION_VOLUME]),
            non_air,
        }
    }

    pub fn get(&self, local: LocalIndex) -> VoxelState {
        self.states[local.index()]
    }

    /// Store a state and return the previous one.
    pub fn set(&mut self, local: LocalIndex, state: VoxelState) -> VoxelState {
        let slot = &mut self.states[local.index()];
        let prev = *slot;
        *slot = state;
        if prev.is_air() != state.is_air() {
            if state.is_air() {
                self.non_air -= 1;
            } else {
                self.non_air += 1;
            }
        }
        prev
    }

    pub fn is_air_only(&self) -> bool {
        self.non_air == 0
    }

    pub fn non_air_count(&self) -> u32 {
        self.non_air
    }
}
