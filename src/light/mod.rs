//! Sky-light bookkeeping and post-destruction repair.

pub mod engine;
pub mod heightmap;
pub mod layer;
pub mod repair;

pub use engine::{LightChannel, LightingEngine, SkyLightStore};
pub use heightmap::ColumnHeights;
pub use layer::LightLayer;
pub use repair::{propagate_indirect_light, repair_direct_sky_light};
