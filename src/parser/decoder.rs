//! Streaming SPE record decoder.
//!
//! Pulls lines from a `BufRead`, tracks sessions with [`SessionScanner`],
//! assembles records with [`PacketAccumulator`] and classifies each one.
//! Translation into typed events is left to the caller (see `pipeline`).

use super::accumulator::{PacketAccumulator, PushOutcome};
use super::classify::{classify, RecordKind};
use super::packet::PacketMap;
use super::session::{ScanEvent, SessionScanner};
use super::tokenizer::tokenize;
use crate::utils::config::UNKNOWN_CPU;
use crate::utils::error::DecodeError;
use log::{info, warn};
use std::io::BufRead;

/// One complete, classified SPE record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRecord {
    /// CPU of the enclosing session, `UNKNOWN_CPU` when no header announced one
    pub cpu: i32,
    pub kind: RecordKind,
    pub packets: PacketMap,
}

/// Counters collected while decoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderStats {
    pub sessions: u64,
    pub records: u64,
    pub malformed_lines: u64,
    pub malformed_latency_packets: u64,
}

/// Pull-based decoder over a perf dump
pub struct TraceDecoder<R> {
    reader: R,
    scanner: SessionScanner,
    prefix_width: usize,
    line: String,
    session_records: u64,
    stats: DecoderStats,
}

impl<R: BufRead> TraceDecoder<R> {
    pub fn new(reader: R, prefix_width: usize) -> Self {
        Self {
            reader,
            scanner: SessionScanner::new(prefix_width),
            prefix_width,
            line: String::new(),
            session_records: 0,
            stats: DecoderStats::default(),
        }
    }

    pub fn stats(&self) -> DecoderStats {
        DecoderStats {
            sessions: self.scanner.sessions(),
            ..self.stats
        }
    }

    /// Decode the next record
    ///
    /// **Public** - main entry point of the decoder
    ///
    /// # Returns
    /// `Ok(None)` once the input is exhausted
    ///
    /// # Errors
    /// * `DecodeError::Io` - reading the input failed
    /// * `DecodeError::TruncatedRecord` - input ended before the record's TS packet
    /// * `DecodeError::UnknownRecord` - record has none of LD, ST, B
    /// * `DecodeError::AmbiguousRecord` - record has more than one of LD, ST, B
    /// * `DecodeError::NoSession` - input ended without a single SPE session
    pub fn next_record(&mut self) -> Result<Option<TraceRecord>, DecodeError> {
        loop {
            if !self.read_line()? {
                info!("End of ARM SPE trace file");
                if self.scanner.sessions() == 0 {
                    return Err(DecodeError::NoSession);
                }
                return Ok(None);
            }

            match self.scanner.observe(&self.line) {
                ScanEvent::SessionStarted => self.session_records = 0,
                ScanEvent::SessionEnded => {
                    info!("{} SPE trace records has been parsed", self.session_records);
                }
                ScanEvent::Malformed => self.stats.malformed_lines += 1,
                ScanEvent::Skipped => {}
                ScanEvent::RecordStart(pc_tokens) => {
                    let cpu = self.scanner.current_cpu().unwrap_or(UNKNOWN_CPU);
                    let packets = self.accumulate(PacketAccumulator::open(&pc_tokens))?;
                    let kind = match classify(&packets) {
                        Ok(RecordKind::Unknown) => {
                            return Err(DecodeError::UnknownRecord { packets })
                        }
                        Ok(kind) => kind,
                        Err(_) => return Err(DecodeError::AmbiguousRecord { packets }),
                    };

                    self.session_records += 1;
                    self.stats.records += 1;
                    return Ok(Some(TraceRecord { cpu, kind, packets }));
                }
            }
        }
    }

    /// Read packet lines until the record's TS packet
    ///
    /// **Private** - bypasses the session scanner, the record owns every line up to TS
    fn accumulate(&mut self, mut acc: PacketAccumulator) -> Result<PacketMap, DecodeError> {
        loop {
            if !self.read_line()? {
                return Err(DecodeError::TruncatedRecord {
                    packets: acc.into_packets(),
                });
            }

            let tokens = match tokenize(&self.line, self.prefix_width) {
                Ok(tokens) => tokens,
                Err(e) => {
                    warn!("{}: {}", e, self.line.trim_end());
                    self.stats.malformed_lines += 1;
                    continue;
                }
            };

            match acc.push(&tokens) {
                PushOutcome::Complete => return Ok(acc.into_packets()),
                PushOutcome::MalformedLatency => self.stats.malformed_latency_packets += 1,
                PushOutcome::Pending | PushOutcome::Skipped => {}
            }
        }
    }

    /// Refill the line buffer, terminator included; false at end of input
    fn read_line(&mut self) -> Result<bool, DecodeError> {
        self.line.clear();
        Ok(self.reader.read_line(&mut self.line)? > 0)
    }
}

impl<R: BufRead> Iterator for TraceDecoder<R> {
    type Item = Result<TraceRecord, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}
