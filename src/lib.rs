//! Voxblast - bulk voxel destruction with sky-light repair

pub mod core;
pub mod math;
pub mod world;
pub mod destruction;
pub mod light;
pub mod net;
pub mod event;
