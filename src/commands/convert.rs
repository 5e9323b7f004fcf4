//! Convert command implementation.
//!
//! The convert command:
//! 1. Opens the `perf script -D` dump
//! 2. Decodes every SPE record into load/store and branch events
//! 3. Writes the branch table, then the load/store table

use super::models::{ConvertArgs, ConvertReport};
use crate::output::TableKind;
use crate::pipeline::decode_into;
use crate::sink::EventSink;
use anyhow::{Context, Result};
use log::{debug, info};
use std::fs::File;
use std::io::BufReader;
use std::time::Instant;

/// Execute the convert command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Convert command arguments
///
/// # Errors
/// * Input file cannot be opened
/// * Any fatal decode fault (truncated, unknown or ambiguous record, or an
///   invalid record when `skip_invalid` is off)
/// * File write errors
pub fn execute_convert(args: &ConvertArgs) -> Result<ConvertReport> {
    let start_time = Instant::now();

    info!("Processing SPE trace file: {}", args.file.display());
    debug!("Convert arguments: {:?}", args);

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open trace file {}", args.file.display()))?;

    info!("Step 1/2: Decoding SPE records...");
    let mut sink = EventSink::new();
    let stats = decode_into(BufReader::new(file), &args.decoder_config(), &mut sink)
        .with_context(|| format!("Failed to decode trace file {}", args.file.display()))?;

    info!("Reached the end of trace file");

    info!("Step 2/2: Writing {} files...", args.format);
    let tables = sink
        .write(&args.output_options())
        .context("Failed to write output tables")?;

    for table in &tables {
        info!(
            "✓ {} table written to: {} ({} rows)",
            table.table,
            table.path.display(),
            table.rows
        );
    }

    let elapsed = start_time.elapsed();
    let report = ConvertReport {
        stats,
        tables,
        elapsed,
    };

    if args.print_summary {
        print_summary(args, &report);
    }

    info!("Convert completed in {:.2}s", elapsed.as_secs_f64());
    Ok(report)
}

/// Validate convert arguments
///
/// **Public** - can be called before execute_convert for early validation
pub fn validate_args(args: &ConvertArgs) -> Result<()> {
    if args.file.as_os_str().is_empty() {
        anyhow::bail!("Input file path cannot be empty");
    }

    if args.prefix.is_empty() {
        anyhow::bail!("Output prefix cannot be empty");
    }

    if args.concurrency == 0 {
        anyhow::bail!("concurrency must be greater than 0");
    }

    if args.batch_size == 0 {
        anyhow::bail!("batch size must be greater than 0");
    }

    if args.prefix_width == 0 {
        anyhow::bail!("prefix width must be greater than 0");
    }

    Ok(())
}

fn print_summary(args: &ConvertArgs, report: &ConvertReport) {
    let stats = &report.stats;

    println!("\n{}", "=".repeat(60));
    println!("SPE DECODE SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Input:             {}", args.file.display());
    println!("Sessions:          {}", stats.sessions);
    println!("Records:           {}", stats.records);
    println!("Load/Store events: {}", stats.load_stores);
    println!("Branch events:     {}", stats.branches);
    println!("Disabled records:  {}", stats.skipped_by_config);
    println!("Invalid records:   {}", stats.skipped_invalid);
    println!("Malformed lines:   {}", stats.malformed_lines);
    println!("Malformed LAT:     {}", stats.malformed_latency_packets);
    for kind in [TableKind::Branch, TableKind::LoadStore] {
        match report.tables.iter().find(|t| t.table == kind) {
            Some(t) => println!("{:<19}{}", format!("{} file:", kind), t.path.display()),
            None => println!("{:<19}(disabled)", format!("{} file:", kind)),
        }
    }
    println!("Elapsed:           {:.2}s", report.elapsed.as_secs_f64());
    println!("{}", "=".repeat(60));
}
