use crate::output::parquet_writer::{META_CREATED_AT, META_SCHEMA_VERSION, META_TABLE};
use crate::output::{branch_schema, load_store_schema, read_summary};
use crate::utils::config::{AUXTRACE_PREFIX_WIDTH, SCHEMA_VERSION};
use anyhow::{Context, Result};
use arrow::datatypes::SchemaRef;
use std::path::Path;

/// Validate a parquet table written by `convert`
pub fn validate_output_file(file_path: &Path) -> Result<()> {
    println!("Validating table: {}", file_path.display());

    let summary = read_summary(file_path)
        .with_context(|| format!("Failed to read parquet file {}", file_path.display()))?;

    println!("✓ Valid parquet file");
    println!(
        "  Table: {}",
        summary.metadata_value(META_TABLE).unwrap_or("unknown")
    );
    println!(
        "  Schema Version: {}",
        summary.metadata_value(META_SCHEMA_VERSION).unwrap_or("unknown")
    );
    if let Some(created_at) = summary.metadata_value(META_CREATED_AT) {
        println!("  Created At: {}", created_at);
    }
    if let Some(created_by) = &summary.created_by {
        println!("  Created By: {}", created_by);
    }
    println!("  Rows: {}", summary.rows);
    println!("  Row Groups: {}", summary.row_groups);
    println!("  Columns: {}", summary.columns.len());
    for (name, data_type) in &summary.columns {
        println!("    {:<12} {}", name, data_type);
    }

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("SPE Parser Output Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();
    println!("Tables:");
    println!("  <prefix>-ldst  - load/store samples");
    println!("  <prefix>-br    - branch samples");

    if show_details {
        print_table("ldst", &load_store_schema());
        print_table("br", &branch_schema());
    } else {
        println!();
        println!("Use --show for detailed schema information");
    }
}

fn print_table(name: &str, schema: &SchemaRef) {
    println!();
    println!("{}:", name);
    for field in schema.fields() {
        println!("  {:<12} {}", field.name(), field.data_type());
    }
}

/// Display version information
pub fn display_version() {
    println!("SPE Parser v{}", env!("CARGO_PKG_VERSION"));
    println!("Output Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Decodes Arm SPE packets from `perf script -D` output");
    println!("(packet column at offset {}) into columnar tables.", AUXTRACE_PREFIX_WIDTH);
}
