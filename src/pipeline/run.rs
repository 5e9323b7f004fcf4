//! Top-level decode loop.
//!
//! Drives the decoder over a whole input, translates each record and stores
//! the event in the sink. Record-level translation faults are resolved here
//! according to the configured [`FaultPolicy`]; every other decode error ends
//! the run.

use crate::parser::classify::RecordKind;
use crate::parser::decoder::{TraceDecoder, TraceRecord};
use crate::parser::packet::PacketMap;
use crate::sink::EventSink;
use crate::translate::{translate_branch, translate_load_store};
use crate::utils::config::{DecoderConfig, FaultPolicy, DEBUG_SAMPLE_INTERVAL};
use crate::utils::error::{DecodeError, TranslateError};
use log::{debug, info, log_enabled, warn, Level};
use serde::Serialize;
use std::io::BufRead;

/// Counters for one decode run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecodeStats {
    pub sessions: u64,
    pub records: u64,
    pub load_stores: u64,
    pub branches: u64,
    /// Records whose kind was disabled in the configuration
    pub skipped_by_config: u64,
    /// Records dropped under `FaultPolicy::Skip`
    pub skipped_invalid: u64,
    pub malformed_lines: u64,
    pub malformed_latency_packets: u64,
}

impl DecodeStats {
    /// Get human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Sessions: {} | Records: {} | Load/Store: {} | Branch: {} | Disabled: {} | Invalid: {}",
            self.sessions,
            self.records,
            self.load_stores,
            self.branches,
            self.skipped_by_config,
            self.skipped_invalid
        )
    }
}

/// What happened to one record
enum Stored {
    LoadStore,
    Branch,
    Disabled,
}

/// Decode every record of `reader` into `sink`
///
/// **Public** - main entry point of the library
///
/// # Arguments
/// * `reader` - `perf script -D` output
/// * `config` - decoder knobs and fault policy
/// * `sink` - receives the translated events in trace order
///
/// # Errors
/// * `DecodeError::InvalidRecord` - translation failed under `FaultPolicy::Abort`
/// * any other `DecodeError` raised by the decoder
pub fn decode_into<R: BufRead>(
    reader: R,
    config: &DecoderConfig,
    sink: &mut EventSink,
) -> Result<DecodeStats, DecodeError> {
    let mut decoder = TraceDecoder::new(reader, config.prefix_width);
    let mut stats = DecodeStats::default();

    while let Some(record) = decoder.next_record()? {
        let sample = log_enabled!(Level::Debug)
            && decoder.stats().records % DEBUG_SAMPLE_INTERVAL == 0;

        match store_record(&record, config, sink, sample) {
            Ok(Stored::LoadStore) => stats.load_stores += 1,
            Ok(Stored::Branch) => stats.branches += 1,
            Ok(Stored::Disabled) => stats.skipped_by_config += 1,
            Err(source) => match config.fault_policy {
                FaultPolicy::Abort => {
                    return Err(DecodeError::InvalidRecord {
                        kind: record.kind,
                        packets: record.packets,
                        source,
                    });
                }
                FaultPolicy::Skip => {
                    warn!(
                        "Skipping invalid {} record: {}, {}",
                        record.kind, source, record.packets
                    );
                    stats.skipped_invalid += 1;
                }
            },
        }
    }

    let decoded = decoder.stats();
    stats.sessions = decoded.sessions;
    stats.records = decoded.records;
    stats.malformed_lines = decoded.malformed_lines;
    stats.malformed_latency_packets = decoded.malformed_latency_packets;

    info!("{}", stats.summary());
    Ok(stats)
}

/// Translate one record and push it to the sink
///
/// **Private** - internal helper for decode_into
fn store_record(
    record: &TraceRecord,
    config: &DecoderConfig,
    sink: &mut EventSink,
    sample: bool,
) -> Result<Stored, TranslateError> {
    match record.kind {
        RecordKind::Load | RecordKind::Store => {
            if !config.parse_load_store {
                return Ok(Stored::Disabled);
            }
            let event = translate_load_store(&record.packets, record.cpu)?;
            if sample {
                log_sample(&record.packets, &event);
            }
            sink.push_load_store(event);
            Ok(Stored::LoadStore)
        }
        RecordKind::Branch => {
            if !config.parse_branch {
                return Ok(Stored::Disabled);
            }
            let event = translate_branch(&record.packets, record.cpu)?;
            if sample {
                log_sample(&record.packets, &event);
            }
            sink.push_branch(event);
            Ok(Stored::Branch)
        }
        RecordKind::Unknown => Err(TranslateError::WrongRecordKind {
            expected: "load/store or branch",
            actual: record.kind,
        }),
    }
}

fn log_sample<T: Serialize>(packets: &PacketMap, event: &T) {
    debug!("{}", packets);
    match serde_json::to_string(event) {
        Ok(json) => debug!("Load/store/Branch: {}", json),
        Err(e) => debug!("Failed to serialize sampled event: {}", e),
    }
}
