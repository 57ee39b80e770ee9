//! Turning one event's results into an ordered message batch.

use std::io::{self, Write};

use log::debug;

use crate::destruction::apply::AppliedDiffs;
use crate::destruction::diff::SectionDiffMap;
use crate::light::heightmap::ColumnHeights;
use crate::math::coords::ChunkPos;
use crate::net::protocol::{HeightMapMessage, SectionDiffMessage, WireMessage};

/// Receives replicated messages; one per connected remote view.
pub trait Observer {
    fn receive(&mut self, message: &WireMessage);
}

/// Build the replication batch for one finished event.
///
/// Order is fixed: destruction diffs first (so remotes drop the voxels
/// before relighting them), then heightmaps, then light-only diffs.
/// Within each group, accumulation order is preserved. The light-only
/// set is consumed.
pub fn drain_event(
    applied: &AppliedDiffs,
    heights: &[(ChunkPos, ColumnHeights)],
    mut light: SectionDiffMap,
) -> Vec<WireMessage> {
    let mut messages =
        Vec::with_capacity(applied.diffs.len() + heights.len() + light.len());

    for (pos, diff) in &applied.diffs {
        messages.push(WireMessage::SectionDiff(SectionDiffMessage::from_diff(
            *pos, diff, false,
        )));
    }
    for (chunk, columns) in heights {
        messages.push(WireMessage::HeightMap(HeightMapMessage {
            chunk: *chunk,
            heights: Box::new(*columns.raw()),
        }));
    }
    for (pos, diff) in light.drain() {
        messages.push(WireMessage::SectionDiff(SectionDiffMessage::from_diff(
            pos, &diff, true,
        )));
    }

    debug!("replication: {} messages queued", messages.len());
    messages
}

/// Encode a batch back-to-back into one writer.
pub fn encode_all<W: Write>(messages: &[WireMessage], writer: &mut W) -> io::Result<()> {
    for message in messages {
        message.encode(writer)?;
    }
    Ok(())
}

/// Deliver a batch to every observer, preserving message order.
pub fn broadcast(observers: &mut [Box<dyn Observer>], messages: &[WireMessage]) {
    for message in messages {
        for observer in observers.iter_mut() {
            observer.receive(message);
        }
    }
}
