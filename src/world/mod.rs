//! Voxel grid: states, sections, collaborator trait, in-memory host

pub mod grid;
pub mod mem;
pub mod section;

pub use grid::VoxelGrid;
pub use mem::MemoryGrid;
pub use section::{Section, VoxelState};
