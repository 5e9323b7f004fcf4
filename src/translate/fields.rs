//! Field-level parsing shared by the load/store and branch translators.

use crate::utils::error::TranslateError;

/// Data source codes reported in DATA-SOURCE packets
///
/// From tools/perf/util/arm-spe-decoder (Neoverse encoding)
const DATA_SOURCES: &[(&str, &str)] = &[
    ("0", "L1D"),
    ("8", "L2D"),
    ("9", "PEER-CPU"),
    ("10", "LOCAL-CLUSTER"),
    ("11", "LL-CACHE"),
    ("12", "PEER-CLUSTER"),
    ("13", "REMOTE"),
    ("14", "DRAM"),
];

/// Exception level at which the hardware drops the top address byte
pub const TRUNCATED_ADDRESS_EL: i32 = 2;

/// Translate a DATA-SOURCE packet to its memory tier name
///
/// **Public** - exposed for tests and schema documentation
///
/// # Errors
/// * `TranslateError::InvalidDataSource` - not exactly one token, or unknown code
pub fn translate_data_source(tokens: &[String]) -> Result<&'static str, TranslateError> {
    let [code] = tokens else {
        return Err(TranslateError::InvalidDataSource(tokens.join(",")));
    };

    DATA_SOURCES
        .iter()
        .find(|(c, _)| *c == code.as_str())
        .map(|(_, name)| *name)
        .ok_or_else(|| TranslateError::InvalidDataSource(code.clone()))
}

/// First token of a packet
pub fn first_token<'a>(
    packet: &'static str,
    field: &'static str,
    tokens: &'a [String],
) -> Result<&'a str, TranslateError> {
    tokens
        .first()
        .map(String::as_str)
        .ok_or(TranslateError::MissingToken { packet, field })
}

/// Parse a plain decimal number; signs and whitespace are rejected
fn parse_unsigned(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse::<u64>().ok()
}

/// Parse the cycle count of an ISSUE / TOT / XLAT packet
pub fn parse_latency(packet: &'static str, tokens: &[String]) -> Result<i32, TranslateError> {
    let value = tokens.first().map(String::as_str).unwrap_or_default();
    parse_unsigned(value)
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| TranslateError::InvalidLatency {
            packet,
            value: value.to_string(),
        })
}

/// Parse the timestamp of a TS packet
pub fn parse_timestamp(tokens: &[String]) -> Result<i64, TranslateError> {
    let value = first_token("TS", "timestamp", tokens)?;
    parse_unsigned(value)
        .and_then(|v| i64::try_from(v).ok())
        .ok_or_else(|| TranslateError::InvalidTimestamp(value.to_string()))
}

/// Parse an address packet of the form `0xffffab47fdb0 el0 ns=1`
///
/// Returns the address verbatim and the exception level taken from the
/// second token with its two-letter "el" prefix removed.
pub fn parse_address(
    packet: &'static str,
    tokens: &[String],
) -> Result<(String, i32), TranslateError> {
    let address = first_token(packet, "address", tokens)?;
    let level = tokens.get(1).ok_or(TranslateError::MissingToken {
        packet,
        field: "exception level",
    })?;

    let el = level
        .get(2..)
        .and_then(parse_unsigned)
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| TranslateError::InvalidPrivilegeLevel {
            packet,
            value: level.clone(),
        })?;

    Ok((address.to_string(), el))
}

/// Put back the top "ff" byte that EL2 addresses are printed without
///
/// `0xffab47fdb0` becomes `0xffffab47fdb0`. Addresses too short to carry
/// a "0x" prefix are returned unchanged.
pub fn restore_top_byte(address: &str) -> String {
    match (address.get(..2), address.get(2..)) {
        (Some(head), Some(tail)) => format!("{head}ff{tail}"),
        _ => address.to_string(),
    }
}
