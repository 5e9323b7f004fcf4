//! Record classification by packet presence.

use super::packet::{PacketKind, PacketMap};
use std::fmt;

/// Kind of a completed SPE record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Load,
    Store,
    Branch,
    Unknown,
}

impl RecordKind {
    pub fn is_load_store(self) -> bool {
        matches!(self, Self::Load | Self::Store)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Load => "load",
            Self::Store => "store",
            Self::Branch => "branch",
            Self::Unknown => "unknown",
        })
    }
}

/// More than one operation packet in a single record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmbiguousRecord;

/// Classify a record by its LD / ST / B packet
///
/// **Public** - used by the decoder once a record is complete
///
/// # Errors
/// * `AmbiguousRecord` - more than one of LD, ST and B is present
pub fn classify(packets: &PacketMap) -> Result<RecordKind, AmbiguousRecord> {
    let found: Vec<RecordKind> = [
        (PacketKind::Ld, RecordKind::Load),
        (PacketKind::St, RecordKind::Store),
        (PacketKind::B, RecordKind::Branch),
    ]
    .into_iter()
    .filter(|(packet, _)| packets.contains(packet))
    .map(|(_, kind)| kind)
    .collect();

    match found.as_slice() {
        [] => Ok(RecordKind::Unknown),
        [kind] => Ok(*kind),
        _ => Err(AmbiguousRecord),
    }
}
