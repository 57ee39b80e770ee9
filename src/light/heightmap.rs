//! Per-column sky-light source heights.

use crate::math::coords::column_index;

/// World-y of the topmost sky-light-blocking voxel for each (x, z) of a
/// chunk column. Every voxel strictly above an entry receives full sky
/// light. An entry below `min_y` means the column has no blocker at all.
///
/// Long-lived state owned by the grid; light repair mutates it in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnHeights {
    heights: Box<[i32; 256]>,
}

impl ColumnHeights {
    /// Create with every column at the same height.
    pub fn new(fill: i32) -> Self {
        Self {
            heights: Box::new([fill; 256]),
        }
    }

    pub fn get(&self, x: u8, z: u8) -> i32 {
        self.heights[column_index(x, z)]
    }

    pub fn set(&mut self, x: u8, z: u8, y: i32) {
        self.heights[column_index(x, z)] = y;
    }

    /// Lower every entry above `ceiling` down to it. Used after a bulk
    /// clear: no blocker can remain above the lowest empty section.
    pub fn clamp_above(&mut self, ceiling: i32) {
        for h in self.heights.iter_mut() {
            if *h > ceiling {
                *h = ceiling;
            }
        }
    }

    /// Raise an entry if `y` is a new topmost blocker.
    pub fn raise_to(&mut self, x: u8, z: u8, y: i32) {
        let slot = &mut self.heights[column_index(x, z)];
        if y > *slot {
            *slot = y;
        }
    }

    /// Backing array, indexed by `x + 16 * z`.
    pub fn raw(&self) -> &[i32; 256] {
        &self.heights
    }
}
