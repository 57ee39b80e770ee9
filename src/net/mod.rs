//! Replication of destruction results to remote views.

pub mod protocol;
pub mod replication;

pub use protocol::{HeightMapMessage, SectionDiffMessage, WireMessage};
pub use replication::{Observer, broadcast, drain_event, encode_all};
