use crate::output::{CompressionCodec, OutputFormat, OutputOptions, WrittenTable};
use crate::pipeline::DecodeStats;
use crate::utils::config::{
    DecoderConfig, FaultPolicy, AUXTRACE_PREFIX_WIDTH, DEFAULT_FLUSH_INTERVAL,
    DEFAULT_OUTPUT_PREFIX, DEFAULT_WRITER_CONCURRENCY,
};
use std::path::PathBuf;
use std::time::Duration;

/// Arguments for the convert command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertArgs {
    /// `perf script -D` output to decode
    pub file: PathBuf,

    /// Output path prefix
    pub prefix: String,

    /// Batch builder threads used by the parquet writer
    pub concurrency: usize,

    pub parse_load_store: bool,
    pub parse_branch: bool,

    pub format: OutputFormat,
    pub compression: CompressionCodec,

    /// Records per flushed batch
    pub batch_size: usize,

    pub prefix_width: usize,

    /// Drop records that fail translation instead of aborting
    pub skip_invalid: bool,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for ConvertArgs {
    fn default() -> Self {
        Self {
            file: PathBuf::new(),
            prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            concurrency: DEFAULT_WRITER_CONCURRENCY,
            parse_load_store: true,
            parse_branch: true,
            format: OutputFormat::default(),
            compression: CompressionCodec::default(),
            batch_size: DEFAULT_FLUSH_INTERVAL,
            prefix_width: AUXTRACE_PREFIX_WIDTH,
            skip_invalid: false,
            print_summary: false,
        }
    }
}

impl ConvertArgs {
    pub fn decoder_config(&self) -> DecoderConfig {
        DecoderConfig {
            prefix_width: self.prefix_width,
            parse_load_store: self.parse_load_store,
            parse_branch: self.parse_branch,
            fault_policy: if self.skip_invalid {
                FaultPolicy::Skip
            } else {
                FaultPolicy::Abort
            },
        }
    }

    pub fn output_options(&self) -> OutputOptions {
        OutputOptions {
            prefix: self.prefix.clone(),
            format: self.format,
            compression: self.compression,
            concurrency: self.concurrency,
            batch_size: self.batch_size,
            write_load_store: self.parse_load_store,
            write_branch: self.parse_branch,
        }
    }
}

/// Result of a convert run
#[derive(Debug, Clone)]
pub struct ConvertReport {
    pub stats: DecodeStats,
    /// Files in the order they were written
    pub tables: Vec<WrittenTable>,
    pub elapsed: Duration,
}
