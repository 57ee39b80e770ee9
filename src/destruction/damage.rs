//! Per-voxel damage policy.

use crate::math::coords::VoxelPos;
use crate::world::section::VoxelState;

/// Decides how voxels resist a blast and which ones may be removed.
///
/// Implementations are consulted once per sampled voxel during the
/// carve pass, so they should be cheap lookups.
pub trait DamageCalculator {
    /// Budget drain for passing through this voxel, before scaling.
    fn resistance(&self, state: VoxelState, pos: VoxelPos) -> f32;

    /// Whether a voxel the ray could afford is actually removed.
    /// Returning false still drains the ray's budget; rays pass
    /// through indestructible voxels, they just never clear them.
    fn may_remove(&self, state: VoxelState, pos: VoxelPos) -> bool {
        let _ = (state, pos);
        true
    }
}

/// Table-driven damage policy keyed by material ID.
///
/// Materials without an entry use `default_resistance`. Fluids fall
/// back to `fluid_resistance` unless their material has an explicit
/// entry.
/// Resistance assigned to materials marked indestructible. High enough
/// to drain any plausible budget when the blast scales resistance at
/// all; removal is refused through `may_remove` regardless.
const INDESTRUCTIBLE_RESISTANCE: f32 = 3_600_000.0;

pub struct MaterialDamage {
    resistances: Vec<Option<f32>>,
    indestructible: Vec<bool>,
    default_resistance: f32,
    fluid_resistance: f32,
}

impl MaterialDamage {
    pub fn new(default_resistance: f32) -> Self {
        Self {
            resistances: Vec::new(),
            indestructible: Vec::new(),
            default_resistance,
            fluid_resistance: 100.0,
        }
    }

    /// Uniform resistance for every material.
    pub fn uniform(resistance: f32) -> Self {
        Self::new(resistance)
    }

    pub fn with_fluid_resistance(mut self, resistance: f32) -> Self {
        self.fluid_resistance = resistance;
        self
    }

    /// Set the resistance of one material.
    pub fn set(&mut self, material: u16, resistance: f32) -> &mut Self {
        let slot = material as usize;
        if slot >= self.resistances.len() {
            self.resistances.resize(slot + 1, None);
        }
        self.resistances[slot] = Some(resistance);
        self
    }

    /// Mark one material as indestructible: its resistance becomes
    /// extreme and `may_remove` refuses it even to rays that can still
    /// afford the drain.
    pub fn set_indestructible(&mut self, material: u16) -> &mut Self {
        self.set(material, INDESTRUCTIBLE_RESISTANCE);
        let slot = material as usize;
        if slot >= self.indestructible.len() {
            self.indestructible.resize(slot + 1, false);
        }
        self.indestructible[slot] = true;
        self
    }
}

impl DamageCalculator for MaterialDamage {
    fn resistance(&self, state: VoxelState, _pos: VoxelPos) -> f32 {
        match self.resistances.get(state.material as usize).copied().flatten() {
            Some(r) => r,
            None if state.is_fluid() => self.fluid_resistance,
            None => self.default_resistance,
        }
    }

    fn may_remove(&self, state: VoxelState, _pos: VoxelPos) -> bool {
        !self
            .indestructible
            .get(state.material as usize)
            .copied()
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_table_lookup() {
        let mut damage = MaterialDamage::new(2.0);
        damage.set(3, 9.5);

        let at = VoxelPos::new(0, 0, 0);
        assert_eq!(damage.resistance(VoxelState::solid(3), at), 9.5);
        assert_eq!(damage.resistance(VoxelState::solid(1), at), 2.0);
    }

    #[test]
    fn test_indestructible_refuses_removal_not_rays() {
        let mut damage = MaterialDamage::new(2.0);
        damage.set_indestructible(7);

        let at = VoxelPos::new(0, 0, 0);
        assert!(!damage.may_remove(VoxelState::solid(7), at));
        assert!(damage.may_remove(VoxelState::solid(1), at));
        assert_eq!(
            damage.resistance(VoxelState::solid(7), at),
            INDESTRUCTIBLE_RESISTANCE
        );
    }

    #[test]
    fn test_fluid_fallback() {
        let damage = MaterialDamage::new(2.0).with_fluid_resistance(50.0);
        let at = VoxelPos::new(0, 0, 0);
        assert_eq!(damage.resistance(VoxelState::fluid(9), at), 50.0);

        // An explicit entry wins over the fluid fallback
        let mut damage = MaterialDamage::new(2.0);
        damage.set(9, 0.5);
        assert_eq!(damage.resistance(VoxelState::fluid(9), at), 0.5);
    }

    #[test]
    fn test_may_remove_defaults_true() {
        let damage = MaterialDamage::uniform(1.0);
        assert!(damage.may_remove(VoxelState::solid(1), VoxelPos::new(0, 0, 0)));
    }
}
