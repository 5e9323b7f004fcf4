//! Branch record translation.

use super::fields::{
    parse_address, parse_latency, parse_timestamp, restore_top_byte, TRUNCATED_ADDRESS_EL,
};
use super::require_kind;
use crate::parser::classify::RecordKind;
use crate::parser::packet::{PacketKind, PacketMap};
use crate::parser::schema::BranchEvent;
use crate::utils::error::TranslateError;

/// Translate a branch record into a [`BranchEvent`]
///
/// **Public** - called by the pipeline for every Branch record
///
/// # Errors
/// * `TranslateError::WrongRecordKind` - record has no B packet
/// * `TranslateError::InvalidBranchOp` - B packet is neither empty, COND nor IND
/// * `TranslateError::UnknownPacketKey` - packet a branch cannot carry
/// * `TranslateError::InvalidLatency` / `InvalidTimestamp` /
///   `InvalidPrivilegeLevel` / `MissingToken` - malformed packet payload
pub fn translate_branch(packets: &PacketMap, cpu: i32) -> Result<BranchEvent, TranslateError> {
    let kind = require_kind(packets, "branch", |k| k == RecordKind::Branch)?;

    let mut event = BranchEvent {
        cpu,
        ..Default::default()
    };

    for (packet, tokens) in packets.iter() {
        match packet {
            PacketKind::B => {
                event.op = packet.to_string();
                let (conditional, indirect) = branch_flags(tokens)?;
                event.conditional = conditional;
                event.indirect = indirect;
            }
            PacketKind::Ev => event.event = tokens.join(":"),
            PacketKind::Issue => event.issue_lat = parse_latency("ISSUE", tokens)?,
            PacketKind::Tot => event.total_lat = parse_latency("TOT", tokens)?,
            PacketKind::Pc => {
                let (pc, el) = parse_address("PC", tokens)?;
                event.pc = pc;
                event.el = el;
            }
            PacketKind::Tgt => {
                let (target, el) = parse_address("TGT", tokens)?;
                event.target = target;
                event.target_el = el;
            }
            PacketKind::Ts => event.ts = parse_timestamp(tokens)?,
            PacketKind::Ld
            | PacketKind::St
            | PacketKind::Xlat
            | PacketKind::Va
            | PacketKind::Pa
            | PacketKind::DataSource
            | PacketKind::Other(_) => {
                return Err(TranslateError::UnknownPacketKey {
                    key: packet.to_string(),
                    kind,
                });
            }
        }
    }

    if event.el == TRUNCATED_ADDRESS_EL {
        event.pc = restore_top_byte(&event.pc);
    }
    if event.target_el == TRUNCATED_ADDRESS_EL {
        event.target = restore_top_byte(&event.target);
    }

    Ok(event)
}

/// Decode the (conditional, indirect) pair from a B packet
fn branch_flags(tokens: &[String]) -> Result<(bool, bool), TranslateError> {
    match tokens {
        [] => Ok((false, false)),
        [op] if op == "COND" => Ok((true, false)),
        [op] if op == "IND" => Ok((false, true)),
        [op] => Err(TranslateError::InvalidBranchOp(op.clone())),
        _ => Err(TranslateError::InvalidBranchOp(tokens.join(" "))),
    }
}
