//! Groups the packet lines of one SPE record into a [`PacketMap`].
//!
//! A record opens with its PC packet and is closed by its TS packet.
//! LAT packets are re-keyed by their latency kind, so `LAT 259 ISSUE`
//! is stored as `ISSUE: [259]`.

use super::packet::{PacketKind, PacketMap};
use log::warn;

/// Result of pushing one tokenized line into the accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Packet stored, record still open
    Pending,
    /// Line carried no data (padding or empty)
    Skipped,
    /// LAT packet without exactly three tokens, dropped
    MalformedLatency,
    /// TS packet stored, record is complete
    Complete,
}

/// Packet map under construction
#[derive(Debug, Clone)]
pub struct PacketAccumulator {
    packets: PacketMap,
}

impl PacketAccumulator {
    /// Start a record from the tokens that followed its PC label
    pub fn open<S: AsRef<str>>(pc_tokens: &[S]) -> Self {
        let mut packets = PacketMap::new();
        packets.insert(PacketKind::Pc, pc_tokens);
        Self { packets }
    }

    /// Add one tokenized packet line
    pub fn push(&mut self, tokens: &[&str]) -> PushOutcome {
        let Some((&label, rest)) = tokens.split_first() else {
            return PushOutcome::Skipped;
        };

        match label {
            "PAD" => PushOutcome::Skipped,
            "TS" => {
                self.packets.insert(PacketKind::Ts, rest);
                PushOutcome::Complete
            }
            "LAT" => {
                // LAT 259 ISSUE
                if tokens.len() != 3 {
                    warn!("invalid LAT packet: {}", tokens.join(" "));
                    return PushOutcome::MalformedLatency;
                }
                self.packets
                    .insert(PacketKind::from_label(tokens[2]), &tokens[1..2]);
                PushOutcome::Pending
            }
            other => {
                self.packets.insert(PacketKind::from_label(other), rest);
                PushOutcome::Pending
            }
        }
    }

    pub fn packets(&self) -> &PacketMap {
        &self.packets
    }

    pub fn into_packets(self) -> PacketMap {
        self.packets
    }
}
