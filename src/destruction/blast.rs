//! Blast parameters.

use glam::Vec3;

/// Parameters of one destructive event.
///
/// `size` is the nominal radius in voxels; the carve pass fires rays at
/// every integer offset whose truncated distance from the origin equals
/// `size`, so the actual reach varies per ray with the budget roll.
#[derive(Clone, Copy, Debug)]
pub struct Blast {
    /// Continuous world-space center.
    pub origin: Vec3,
    /// Nominal radius in voxels. Non-positive blasts carve nothing.
    pub size: i32,
    /// Multiplier on how strongly material resistance drains ray
    /// budget. `0.0` means resistance is ignored entirely.
    pub resistance_impact: f32,
    /// Widens the random spread of per-ray budgets. `1.0` is the
    /// standard 0.7..1.3 band.
    pub spread_factor: f32,
    /// When set, fluids cost no budget and are carved for free.
    pub ignore_fluid_resistance: bool,
}

impl Blast {
    pub fn new(origin: Vec3, size: i32) -> Self {
        Self {
            origin,
            size,
            resistance_impact: 1.0,
            spread_factor: 1.0,
            ignore_fluid_resistance: false,
        }
    }

    /// A blast that carves nothing. Useful as a placeholder where an
    /// API wants a blast value but no destruction should occur.
    pub fn inert() -> Self {
        Self::new(Vec3::ZERO, 0)
    }

    pub fn resistance_impact(mut self, value: f32) -> Self {
        self.resistance_impact = value;
        self
    }

    pub fn spread_factor(mut self, value: f32) -> Self {
        self.spread_factor = value;
        self
    }

    pub fn ignore_fluid_resistance(mut self, value: bool) -> Self {
        self.ignore_fluid_resistance = value;
        self
    }

    /// Scale applied to every resistance deduction.
    pub fn scale(&self) -> f32 {
        0.3 * self.resistance_impact
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let blast = Blast::new(Vec3::new(1.0, 2.0, 3.0), 10);
        assert_eq!(blast.size, 10);
        assert_eq!(blast.resistance_impact, 1.0);
        assert_eq!(blast.spread_factor, 1.0);
        assert!(!blast.ignore_fluid_resistance);
        assert_eq!(blast.scale(), 0.3);
    }

    #[test]
    fn test_inert_blast() {
        let blast = Blast::inert();
        assert_eq!(blast.size, 0);
    }

    #[test]
    fn test_zero_resistance_impact_zeroes_scale() {
        let blast = Blast::new(Vec3::ZERO, 5).resistance_impact(0.0);
        assert_eq!(blast.scale(), 0.0);
    }
}
