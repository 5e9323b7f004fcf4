//! Configuration and constants for the decoder and the CLI.

use regex::Regex;
use std::sync::LazyLock;

/// Width of the offset/hex-dump column that precedes every decoded packet
/// in `perf script -D` output
pub const AUXTRACE_PREFIX_WIDTH: usize = 62;

/// Substring of the line that opens an SPE session
pub const SESSION_MARKER: &str = "ARM SPE data";

/// Tag of the perf record header that carries the CPU of the following session
pub const AUXTRACE_TAG: &str = "PERF_RECORD_AUXTRACE";

/// CPU id reported when no auxtrace header has been seen
pub const UNKNOWN_CPU: i32 = -1;

/// Current output schema version, stored in parquet metadata
pub const SCHEMA_VERSION: &str = "1.0.0";

pub const DEFAULT_OUTPUT_PREFIX: &str = "spe";
pub const DEFAULT_WRITER_CONCURRENCY: usize = 8;
pub const DEFAULT_FLUSH_INTERVAL: usize = 100_000;

/// Every Nth record is dumped at debug level
pub const DEBUG_SAMPLE_INTERVAL: u64 = 10_000;

/// Matches "cpu: ID" in perf record headers. Compiled once at first use.
pub static CPU_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bcpu:\s+(\d+)").expect("Invalid cpu id regex pattern"));

/// What the run loop does with a record that fails translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultPolicy {
    /// Stop the whole run on the first invalid record
    #[default]
    Abort,
    /// Log the record and keep decoding
    Skip,
}

/// Decoder behaviour knobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Characters stripped from each line before tokenizing
    pub prefix_width: usize,

    /// Translate load/store records (otherwise they are dropped after classification)
    pub parse_load_store: bool,

    /// Translate branch records (otherwise they are dropped after classification)
    pub parse_branch: bool,

    pub fault_policy: FaultPolicy,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            prefix_width: AUXTRACE_PREFIX_WIDTH,
            parse_load_store: true,
            parse_branch: true,
            fault_policy: FaultPolicy::Abort,
        }
    }
}
