//! Section diff accumulation.
//!
//! Removed voxels are recorded per section as a 4096-bit set. The
//! moment every bit of a section is set, the bitset is dropped and the
//! section is kept as a constant-size "fully cleared" sentinel, so the
//! memory cost of an event is bounded by the number of distinct
//! sections it touches.

use bitvec::prelude::*;
use std::collections::HashMap;

use crate::math::coords::{LocalIndex, SECTION_VOLUME, SectionPos};

/// Fixed 4096-bit set, one bit per voxel of a section.
pub type SectionBits = BitArr!(for SECTION_VOLUME, in u64);

/// Bitset half of a section diff, with a running cardinality so the
/// escalation check never rescans the words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialBits {
    bits: SectionBits,
    count: u16,
}

impl PartialBits {
    fn new() -> Self {
        Self {
            bits: BitArray::ZERO,
            count: 0,
        }
    }

    /// Set a bit; returns true if it was newly set.
    fn mark(&mut self, local: LocalIndex) -> bool {
        let index = local.index();
        if self.bits[index] {
            return false;
        }
        self.bits.set(index, true);
        self.count += 1;
        true
    }

    pub fn contains(&self, local: LocalIndex) -> bool {
        self.bits[local.index()]
    }

    pub fn cardinality(&self) -> usize {
        self.count as usize
    }

    /// Set local indices in ascending packed order.
    pub fn indices(&self) -> impl Iterator<Item = LocalIndex> + '_ {
        self.bits.iter_ones().map(|i| LocalIndex::from_raw(i as u16))
    }
}

/// Per-section mutation record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SectionDiff {
    /// Sparse or medium change set, enumerable as local indices.
    Partial(Box<PartialBits>),
    /// Every voxel in the section became air.
    FullClear,
}

impl SectionDiff {
    pub fn is_full_clear(&self) -> bool {
        matches!(self, SectionDiff::FullClear)
    }
}

/// Accumulates section diffs for one destructive event.
///
/// Drains in insertion order. Created fresh per event and consumed
/// exactly once.
pub struct SectionDiffMap {
    entries: HashMap<SectionPos, SectionDiff>,
    order: Vec<SectionPos>,
}

impl SectionDiffMap {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Record a removed voxel. Idempotent. Escalates the section to
    /// `FullClear` exactly when its 4096th bit is set.
    pub fn mark(&mut self, section: SectionPos, local: LocalIndex) {
        match self.entries.get_mut(&section) {
            None => {
                let mut bits = Box::new(PartialBits::new());
                bits.mark(local);
                self.entries.insert(section, SectionDiff::Partial(bits));
                self.order.push(section);
            }
            Some(entry) => {
                let escalate = match entry {
                    SectionDiff::FullClear => false,
                    SectionDiff::Partial(bits) => {
                        bits.mark(local);
                        bits.cardinality() == SECTION_VOLUME
                    }
                };
                if escalate {
                    *entry = SectionDiff::FullClear;
                }
            }
        }
    }

    pub fn get(&self, section: SectionPos) -> Option<&SectionDiff> {
        self.entries.get(&section)
    }

    /// Number of distinct sections touched.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Touched sections in insertion order.
    pub fn sections(&self) -> impl Iterator<Item = SectionPos> + '_ {
        self.order.iter().copied()
    }

    /// Remove and return every finalized diff, in insertion order.
    /// The accumulator is empty afterwards.
    pub fn drain(&mut self) -> Vec<(SectionPos, SectionDiff)> {
        let order = std::mem::take(&mut self.order);
        order
            .into_iter()
            .filter_map(|pos| self.entries.remove(&pos).map(|diff| (pos, diff)))
            .collect()
    }
}

impl Default for SectionDiffMap {
    fn default() -> Self {
        Self::new()
    }
}
