//! Packet kinds and the per-record packet map.
//!
//! A decoded SPE record is a handful of packets, each printed on its own line
//! and introduced by a kind label. The accumulator keys them by [`PacketKind`]
//! so that translators can match exhaustively on the kinds they understand.

use std::collections::BTreeMap;
use std::fmt;

/// Kind label of a decoded packet (after LAT packets have been re-keyed)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PacketKind {
    Pc,
    Ld,
    St,
    B,
    Ev,
    Issue,
    Tot,
    Xlat,
    Va,
    Pa,
    Tgt,
    DataSource,
    Ts,
    /// Any label this decoder has no typed handling for (e.g. CONTEXT, PBT)
    Other(String),
}

impl std::str::FromStr for PacketKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "PC" => Self::Pc,
            "LD" => Self::Ld,
            "ST" => Self::St,
            "B" => Self::B,
            "EV" => Self::Ev,
            "ISSUE" => Self::Issue,
            "TOT" => Self::Tot,
            "XLAT" => Self::Xlat,
            "VA" => Self::Va,
            "PA" => Self::Pa,
            "TGT" => Self::Tgt,
            "DATA-SOURCE" => Self::DataSource,
            "TS" => Self::Ts,
            other => Self::Other(other.to_string()),
        })
    }
}

impl PacketKind {
    /// Parse a label; never fails because unknown labels become `Other`
    pub fn from_label(label: &str) -> Self {
        match label.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }

    /// Label as printed by perf
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pc => "PC",
            Self::Ld => "LD",
            Self::St => "ST",
            Self::B => "B",
            Self::Ev => "EV",
            Self::Issue => "ISSUE",
            Self::Tot => "TOT",
            Self::Xlat => "XLAT",
            Self::Va => "VA",
            Self::Pa => "PA",
            Self::Tgt => "TGT",
            Self::DataSource => "DATA-SOURCE",
            Self::Ts => "TS",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All packets of one record, keyed by kind
///
/// Inserting a kind that is already present replaces its tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PacketMap {
    packets: BTreeMap<PacketKind, Vec<String>>,
}

impl PacketMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tokens for `kind`, replacing any earlier packet of that kind
    pub fn insert<S: AsRef<str>>(&mut self, kind: PacketKind, tokens: &[S]) {
        let tokens = tokens.iter().map(|t| t.as_ref().to_string()).collect();
        self.packets.insert(kind, tokens);
    }

    pub fn get(&self, kind: &PacketKind) -> Option<&[String]> {
        self.packets.get(kind).map(Vec::as_slice)
    }

    pub fn contains(&self, kind: &PacketKind) -> bool {
        self.packets.contains_key(kind)
    }

    /// A record is complete once its TS packet has been seen
    pub fn is_complete(&self) -> bool {
        self.contains(&PacketKind::Ts)
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PacketKind, &[String])> {
        self.packets.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

impl fmt::Display for PacketMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (kind, tokens)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: [{}]", kind, tokens.join(" "))?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_kind_parsing() {
        assert_eq!(PacketKind::from_label("DATA-SOURCE"), PacketKind::DataSource);
        assert_eq!(PacketKind::from_label("TS"), PacketKind::Ts);
        assert_eq!(
            PacketKind::from_label("CONTEXT"),
            PacketKind::Other("CONTEXT".to_string())
        );
        assert_eq!(PacketKind::from_label("CONTEXT").as_str(), "CONTEXT");
    }

    #[test]
    fn test_insert_overwrites() {
        let mut packets = PacketMap::new();
        packets.insert(PacketKind::Ev, &["RETIRED"]);
        packets.insert(PacketKind::Ev, &["L1D-ACCESS"]);
        assert_eq!(packets.len(), 1);
        assert_eq!(packets.get(&PacketKind::Ev).unwrap(), ["L1D-ACCESS"]);
    }

    #[test]
    fn test_display() {
        let mut packets = PacketMap::new();
        packets.insert(PacketKind::Ts, &["100"]);
        packets.insert(PacketKind::Pc, &["0x1000", "el0", "ns=1"]);
        assert_eq!(packets.to_string(), "{PC: [0x1000 el0 ns=1], TS: [100]}");
        assert!(packets.is_complete());
    }
}
