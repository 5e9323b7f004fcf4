//! Translation of classified packet maps into typed events.
//!
//! Each translator walks the packets of one record, parses the ones it
//! understands and rejects any packet kind it cannot carry. Both apply the
//! EL2 address correction once all packets are read.

pub mod branch;
pub mod fields;
pub mod load_store;

pub use branch::translate_branch;
pub use fields::{restore_top_byte, translate_data_source};
pub use load_store::translate_load_store;

use crate::parser::classify::{classify, RecordKind};
use crate::parser::packet::PacketMap;
use crate::utils::error::TranslateError;

/// Classify `packets` and check the result against what a translator accepts
fn require_kind(
    packets: &PacketMap,
    expected: &'static str,
    accepts: impl Fn(RecordKind) -> bool,
) -> Result<RecordKind, TranslateError> {
    let actual = classify(packets).unwrap_or(RecordKind::Unknown);
    if accepts(actual) {
        Ok(actual)
    } else {
        Err(TranslateError::WrongRecordKind { expected, actual })
    }
}
