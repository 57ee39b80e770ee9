//! Destructive-event pipeline: carve, accumulate, apply.

pub mod apply;
pub mod blast;
pub mod damage;
pub mod diff;
pub mod raymarch;

pub use apply::{AppliedDiffs, ChunkSectionMask, apply};
pub use blast::Blast;
pub use damage::{DamageCalculator, MaterialDamage};
pub use diff::{SectionDiff, SectionDiffMap};
pub use raymarch::carve;
