//! Table writers for decoded events.
//!
//! This module handles writing the two event tables to disk:
//! - Parquet files (default, compressed, with schema metadata)
//! - CSV files with a header row
//! - Reading a parquet table back for validation

pub mod columns;
pub mod csv_writer;
pub mod parquet_writer;
pub mod reader;

use crate::utils::config::{
    DEFAULT_FLUSH_INTERVAL, DEFAULT_OUTPUT_PREFIX, DEFAULT_WRITER_CONCURRENCY,
};
use crate::utils::error::OutputError;
use clap::ValueEnum;
use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};

// Re-export main functions
pub use columns::{branch_schema, load_store_schema, ColumnarRecord};
pub use reader::{read_batches, read_summary, TableSummary};

/// File format of the output tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Parquet,
    Csv,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Parquet => "parquet",
            OutputFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Parquet => write!(f, "Parquet"),
            OutputFormat::Csv => write!(f, "CSV"),
        }
    }
}

/// Column compression codec for parquet output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CompressionCodec {
    #[default]
    Zstd,
    Gzip,
    Snappy,
    None,
}

impl CompressionCodec {
    pub fn to_parquet(self) -> parquet::basic::Compression {
        use parquet::basic::{Compression, GzipLevel, ZstdLevel};
        match self {
            CompressionCodec::Zstd => Compression::ZSTD(ZstdLevel::default()),
            CompressionCodec::Gzip => Compression::GZIP(GzipLevel::default()),
            CompressionCodec::Snappy => Compression::SNAPPY,
            CompressionCodec::None => Compression::UNCOMPRESSED,
        }
    }
}

/// The two output tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    LoadStore,
    Branch,
}

impl TableKind {
    /// Suffix appended to the output prefix
    pub fn suffix(self) -> &'static str {
        match self {
            TableKind::LoadStore => "ldst",
            TableKind::Branch => "br",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TableKind::LoadStore => "load/store",
            TableKind::Branch => "branch",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How and where the tables are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    /// Output files are `<prefix>-ldst.<ext>` and `<prefix>-br.<ext>`
    pub prefix: String,
    pub format: OutputFormat,
    pub compression: CompressionCodec,

    /// Record batches built in parallel per write wave
    pub concurrency: usize,

    /// Rows per record batch; each batch is flushed as a parquet row group
    pub batch_size: usize,

    pub write_load_store: bool,
    pub write_branch: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            format: OutputFormat::default(),
            compression: CompressionCodec::default(),
            concurrency: DEFAULT_WRITER_CONCURRENCY,
            batch_size: DEFAULT_FLUSH_INTERVAL,
            write_load_store: true,
            write_branch: true,
        }
    }
}

impl OutputOptions {
    /// Path of the file holding `table`
    pub fn path_for(&self, table: TableKind) -> PathBuf {
        PathBuf::from(format!(
            "{}-{}.{}",
            self.prefix,
            table.suffix(),
            self.format.extension()
        ))
    }
}

/// One file produced by [`write_table`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTable {
    pub table: TableKind,
    pub path: PathBuf,
    pub rows: usize,
}

/// Write one table in the configured format
///
/// **Public** - main entry point for table output
///
/// An empty slice still produces a file holding only the schema (parquet)
/// or the header row (CSV).
///
/// # Arguments
/// * `records` - events in trace order
/// * `options` - output location, format and writer tuning
///
/// # Errors
/// * `OutputError::InvalidPath` - path is a directory or its parent cannot be created
/// * `OutputError::Io` / `Arrow` / `Parquet` - write failure
pub fn write_table<T: ColumnarRecord + Sync>(
    records: &[T],
    options: &OutputOptions,
) -> Result<WrittenTable, OutputError> {
    let path = options.path_for(T::TABLE);

    validate_output_path(&path)?;
    create_parent_dirs(&path)?;

    info!("Generating {} file: {}", options.format, path.display());
    info!("{} {} records to write", records.len(), T::TABLE);

    match options.format {
        OutputFormat::Parquet => parquet_writer::write_parquet(records, &path, options)?,
        OutputFormat::Csv => csv_writer::write_csv(records, &path, options)?,
    }

    info!(
        "{} file written successfully ({} bytes)",
        T::TABLE,
        calculate_file_size(&path)
    );

    Ok(WrittenTable {
        table: T::TABLE,
        path,
        rows: records.len(),
    })
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

fn create_parent_dirs(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for_tables() {
        let options = OutputOptions {
            prefix: "out/run1".to_string(),
            ..Default::default()
        };
        assert_eq!(
            options.path_for(TableKind::Branch),
            PathBuf::from("out/run1-br.parquet")
        );

        let csv = OutputOptions {
            format: OutputFormat::Csv,
            ..options
        };
        assert_eq!(
            csv.path_for(TableKind::LoadStore),
            PathBuf::from("out/run1-ldst.csv")
        );
    }

    #[test]
    fn test_validate_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = validate_output_path(dir.path());
        assert!(matches!(result, Err(OutputError::InvalidPath(_))));
    }

    #[test]
    fn test_validate_rejects_empty_path() {
        assert!(validate_output_path(Path::new("")).is_err());
    }

    #[test]
    fn test_compression_mapping() {
        use parquet::basic::Compression;
        assert_eq!(CompressionCodec::Snappy.to_parquet(), Compression::SNAPPY);
        assert_eq!(CompressionCodec::None.to_parquet(), Compression::UNCOMPRESSED);
        assert!(matches!(
            CompressionCodec::Zstd.to_parquet(),
            Compression::ZSTD(_)
        ));
    }
}
