//! SPE Parser CLI
//!
//! Converts Arm SPE samples from `perf script -D` output into
//! load/store and branch tables (parquet or CSV).

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use spe_parser::commands::{
    display_schema, display_version, execute_convert, validate_args, validate_output_file,
    ConvertArgs,
};
use spe_parser::output::{CompressionCodec, OutputFormat};
use spe_parser::utils::config::{
    AUXTRACE_PREFIX_WIDTH, DEFAULT_FLUSH_INTERVAL, DEFAULT_OUTPUT_PREFIX,
    DEFAULT_WRITER_CONCURRENCY,
};

/// SPE Parser - Arm SPE trace decoder
#[derive(Parser, Debug)]
#[command(name = "spe-parser")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, visible_alias = "verbose")]
    debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a `perf script -D` dump into SPE tables
    Convert {
        /// Input file produced by `perf script -D`
        #[arg(short, long)]
        file: PathBuf,

        /// Output file prefix
        #[arg(short, long, default_value = DEFAULT_OUTPUT_PREFIX)]
        prefix: String,

        /// Threads used to build record batches
        #[arg(short, long, default_value_t = DEFAULT_WRITER_CONCURRENCY)]
        concurrency: usize,

        /// Do not parse load/store records
        #[arg(short = 'l', long)]
        noldst: bool,

        /// Do not parse branch records
        #[arg(short = 'b', long)]
        nobr: bool,

        /// Output file type
        #[arg(short = 't', long = "type", value_enum, default_value_t = OutputFormat::Parquet)]
        format: OutputFormat,

        /// Parquet compression codec
        #[arg(long, value_enum, default_value_t = CompressionCodec::Zstd)]
        compression: CompressionCodec,

        /// Records per flushed batch
        #[arg(long, default_value_t = DEFAULT_FLUSH_INTERVAL)]
        batch_size: usize,

        /// Width of the offset/hex-dump column before each packet
        #[arg(long, default_value_t = AUXTRACE_PREFIX_WIDTH)]
        prefix_width: usize,

        /// Skip records that fail translation instead of aborting
        #[arg(long)]
        skip_invalid: bool,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a parquet table written by `convert`
    Validate {
        /// Path to parquet file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Convert {
            file,
            prefix,
            concurrency,
            noldst,
            nobr,
            format,
            compression,
            batch_size,
            prefix_width,
            skip_invalid,
            summary,
        } => {
            let args = ConvertArgs {
                file,
                prefix,
                concurrency,
                parse_load_store: !noldst,
                parse_branch: !nobr,
                format,
                compression,
                batch_size,
                prefix_width,
                skip_invalid,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_convert(&args)?;
        }

        Commands::Validate { file } => {
            validate_output_file(&file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
