//! World-limit configuration.

use serde::{Deserialize, Serialize};

/// Vertical world bounds in voxel coordinates, half-open `[min_y, max_y)`.
///
/// Horizontal extent is unbounded. Sections are addressed by
/// `voxel_y >> 4`; the light grid carries one extra section below the
/// bottom block section and one above the top, so "everything above the
/// world" and "everything below it" have somewhere to store data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldLimits {
    pub min_y: i32,
    pub max_y: i32,
}

impl Default for WorldLimits {
    fn default() -> Self {
        Self {
            min_y: -64,
            max_y: 320,
        }
    }
}

impl WorldLimits {
    pub fn new(min_y: i32, max_y: i32) -> Self {
        debug_assert!(min_y % 16 == 0 && max_y % 16 == 0 && min_y < max_y);
        Self { min_y, max_y }
    }

    pub fn contains_y(&self, y: i32) -> bool {
        y >= self.min_y && y < self.max_y
    }

    /// Lowest block section.
    pub fn min_section(&self) -> i32 {
        self.min_y >> 4
    }

    /// Highest block section (inclusive).
    pub fn max_section(&self) -> i32 {
        (self.max_y - 1) >> 4
    }

    /// Lowest light section, one below the block sections.
    pub fn min_light_section(&self) -> i32 {
        self.min_section() - 1
    }

    /// Highest light section, one above the block sections.
    pub fn max_light_section(&self) -> i32 {
        self.max_section() + 1
    }

    pub fn light_section_count(&self) -> usize {
        (self.max_light_section() - self.min_light_section() + 1) as usize
    }

    /// Index of a section in per-chunk light-section masks.
    pub fn light_section_index(&self, section_y: i32) -> usize {
        debug_assert!(
            section_y >= self.min_light_section() && section_y <= self.max_light_section()
        );
        (section_y - self.min_light_section()) as usize
    }

    pub fn section_from_light_index(&self, index: usize) -> i32 {
        self.min_light_section() + index as i32
    }

    pub fn contains_section(&self, section_y: i32) -> bool {
        section_y >= self.min_section() && section_y <= self.max_section()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_range() {
        let limits = WorldLimits::new(-64, 320);
        assert_eq!(limits.min_section(), -4);
        assert_eq!(limits.max_section(), 19);
        assert_eq!(limits.min_light_section(), -5);
        assert_eq!(limits.max_light_section(), 20);
        assert_eq!(limits.light_section_count(), 26);
    }

    #[test]
    fn test_light_section_index_round_trip() {
        let limits = WorldLimits::new(0, 256);
        for y in limits.min_light_section()..=limits.max_light_section() {
            assert_eq!(limits.section_from_light_index(limits.light_section_index(y)), y);
        }
    }

    #[test]
    fn test_contains_y_half_open() {
        let limits = WorldLimits::new(0, 64);
        assert!(limits.contains_y(0));
        assert!(limits.contains_y(63));
        assert!(!limits.contains_y(64));
        assert!(!limits.contains_y(-1));
    }
}
