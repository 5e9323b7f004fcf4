//! Load/store record translation.

use super::fields::{
    first_token, parse_address, parse_latency, parse_timestamp, restore_top_byte,
    translate_data_source, TRUNCATED_ADDRESS_EL,
};
use super::require_kind;
use crate::parser::packet::{PacketKind, PacketMap};
use crate::parser::schema::LoadStoreEvent;
use crate::utils::error::TranslateError;

/// Subclass reported for plain loads/stores without an explicit class token
pub const DEFAULT_SUBCLASS: &str = "GP-REG";

/// Translate a load or store record into a [`LoadStoreEvent`]
///
/// **Public** - called by the pipeline for every Load/Store record
///
/// # Arguments
/// * `packets` - Completed packet map of the record
/// * `cpu` - CPU of the enclosing session
///
/// # Errors
/// * `TranslateError::WrongRecordKind` - record has no LD or ST packet
/// * `TranslateError::UnknownPacketKey` - packet a load/store cannot carry
/// * `TranslateError::InvalidDataSource` / `InvalidLatency` / `InvalidTimestamp` /
///   `InvalidPrivilegeLevel` / `MissingToken` - malformed packet payload
pub fn translate_load_store(
    packets: &PacketMap,
    cpu: i32,
) -> Result<LoadStoreEvent, TranslateError> {
    let kind = require_kind(packets, "load/store", |k| k.is_load_store())?;

    let mut event = LoadStoreEvent {
        cpu,
        ..Default::default()
    };

    for (packet, tokens) in packets.iter() {
        match packet {
            PacketKind::DataSource => {
                event.data_source = translate_data_source(tokens)?.to_string();
            }
            PacketKind::Ev => event.event = tokens.join(":"),
            PacketKind::Issue => event.issue_lat = parse_latency("ISSUE", tokens)?,
            PacketKind::Tot => event.total_lat = parse_latency("TOT", tokens)?,
            PacketKind::Xlat => event.xlat_lat = parse_latency("XLAT", tokens)?,
            PacketKind::Pa => event.paddr = first_token("PA", "address", tokens)?.to_string(),
            PacketKind::Va => event.vaddr = first_token("VA", "address", tokens)?.to_string(),
            PacketKind::Pc => {
                // 0xffffab47fdb0 el0 ns=1
                let (pc, el) = parse_address("PC", tokens)?;
                event.pc = pc;
                event.el = el;
            }
            PacketKind::Ts => event.ts = parse_timestamp(tokens)?,
            PacketKind::Ld | PacketKind::St => apply_operation(&mut event, packet, tokens),
            PacketKind::B | PacketKind::Tgt | PacketKind::Other(_) => {
                return Err(TranslateError::UnknownPacketKey {
                    key: packet.to_string(),
                    kind,
                });
            }
        }
    }

    if event.el == TRUNCATED_ADDRESS_EL {
        event.pc = restore_top_byte(&event.pc);
        event.vaddr = restore_top_byte(&event.vaddr);
    }

    Ok(event)
}

/// Fill operation, flags and subclass from an LD/ST packet
///
/// **Private** - see tools/perf/util/arm-spe-decoder/arm-spe-pkt-decoder.c
/// for the flag spellings
fn apply_operation(event: &mut LoadStoreEvent, packet: &PacketKind, tokens: &[String]) {
    event.op = packet.to_string();
    event.subclass = DEFAULT_SUBCLASS.to_string();

    let flags = tokens.join(" ");
    if flags.contains("AT") {
        event.atomic = true;
        event.subclass.clear();
    }
    if flags.contains("EXCL") {
        event.exclusive = true;
        event.subclass.clear();
    }
    if flags.contains("AR") {
        event.acquire_release = true;
        event.subclass.clear();
    }

    if !event.atomic && !event.exclusive && !event.acquire_release {
        if let Some(class) = tokens.first() {
            event.subclass = class.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn load(op: &[&str]) -> PacketMap {
        let mut packets = PacketMap::new();
        packets.insert(PacketKind::Pc, &["0xaaaaab110e5c", "el0", "ns=1"]);
        packets.insert(PacketKind::Ld, op);
        packets.insert(PacketKind::Ts, &["100"]);
        packets
    }

    #[test]
    fn test_plain_load_keeps_register_class() {
        let event = translate_load_store(&load(&["SIMD-FP"]), 1).unwrap();
        assert_eq!(event.op, "LD");
        assert_eq!(event.subclass, "SIMD-FP");
        assert!(!event.atomic && !event.exclusive && !event.acquire_release);
    }

    #[test]
    fn test_empty_operation_defaults_to_gp_reg() {
        let event = translate_load_store(&load(&[]), 1).unwrap();
        assert_eq!(event.subclass, DEFAULT_SUBCLASS);
    }

    #[test]
    fn test_flags_clear_subclass() {
        let event = translate_load_store(&load(&["AT"]), 1).unwrap();
        assert!(event.atomic);
        assert_eq!(event.subclass, "");

        let event = translate_load_store(&load(&["EXCL", "AR"]), 1).unwrap();
        assert!(event.exclusive);
        assert!(event.acquire_release);
        assert!(!event.atomic);
        assert_eq!(event.subclass, "");
    }

    #[test]
    fn test_branch_packet_is_rejected() {
        let mut packets = load(&["GP-REG"]);
        packets.insert(PacketKind::Tgt, &["0x1000", "el0"]);
        assert_eq!(
            translate_load_store(&packets, 0),
            Err(TranslateError::UnknownPacketKey {
                key: "TGT".to_string(),
                kind: crate::parser::RecordKind::Load,
            })
        );
    }

    #[test]
    fn test_branch_record_is_wrong_kind() {
        let mut packets = PacketMap::new();
        packets.insert(PacketKind::B, &["COND"]);
        assert!(matches!(
            translate_load_store(&packets, 0),
            Err(TranslateError::WrongRecordKind { .. })
        ));
    }

    #[test]
    fn test_signed_exception_level_is_not_corrected() {
        let mut packets = PacketMap::new();
        packets.insert(PacketKind::Pc, &["0xab47fdb0", "el+2"]);
        packets.insert(PacketKind::Ld, &["GP-REG"]);
        packets.insert(PacketKind::Issue, &["5"]);
        packets.insert(PacketKind::Ts, &["100"]);
        assert_eq!(
            translate_load_store(&packets, 0),
            Err(TranslateError::InvalidPrivilegeLevel {
                packet: "PC",
                value: "el+2".to_string(),
            })
        );

        let mut packets = load(&["GP-REG"]);
        packets.insert(PacketKind::Issue, &["+5"]);
        assert!(matches!(
            translate_load_store(&packets, 0),
            Err(TranslateError::InvalidLatency { .. })
        ));
    }
}
