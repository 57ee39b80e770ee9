//! Packed per-section light storage.

use crate::math::coords::{LocalIndex, SECTION_VOLUME};

/// Light levels for one section, two voxels per byte.
///
/// Values are nibbles in `[0, 15]`, addressed by packed local index:
/// even indices live in the low nibble, odd in the high.
#[derive(Clone, PartialEq, Eq)]
pub struct LightLayer {
    data: Box<[u8; SECTION_VOLUME / 2]>,
}

impl LightLayer {
    /// All levels zero.
    pub fn dark() -> Self {
        Self::filled(0)
    }

    /// All levels at the maximum of 15.
    pub fn full() -> Self {
        Self::filled(15)
    }

    /// Every voxel at the same level.
    pub fn filled(level: u8) -> Self {
        debug_assert!(level <= 15);
        let byte = level | (level << 4);
        Self {
            data: Box::new([byte; SECTION_VOLUME / 2]),
        }
    }

    pub fn get(&self, local: LocalIndex) -> u8 {
        let index = local.index();
        (self.data[index >> 1] >> ((index & 1) << 2)) & 15
    }

    pub fn set(&mut self, local: LocalIndex, level: u8) {
        debug_assert!(level <= 15);
        let index = local.index();
        let shift = (index & 1) << 2;
        let byte = &mut self.data[index >> 1];
        *byte = (*byte & !(15 << shift)) | (level << shift);
    }

    /// Packed backing bytes.
    pub fn bytes(&self) -> &[u8; SECTION_VOLUME / 2] {
        &self.data
    }
}

impl std::fmt::Debug for LightLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LightLayer").finish_non_exhaustive()
    }
}
