//! Parquet table reader used by `validate` and the tests.

use crate::utils::error::OutputError;
use arrow::array::RecordBatch;
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Shape and metadata of a written table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub path: PathBuf,
    pub rows: i64,
    pub row_groups: usize,
    /// (name, arrow type) in schema order
    pub columns: Vec<(String, String)>,
    /// Key/value metadata, without the embedded arrow schema
    pub metadata: Vec<(String, String)>,
    pub created_by: Option<String>,
}

impl TableSummary {
    /// Look up one key of the file metadata
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Read the footer of a parquet table
///
/// **Public** - used by the `validate` command
///
/// # Errors
/// * `OutputError::Io` - file cannot be opened
/// * `OutputError::Parquet` - file is not valid parquet
pub fn read_summary(path: impl AsRef<Path>) -> Result<TableSummary, OutputError> {
    let path = path.as_ref();
    debug!("Reading parquet footer from: {}", path.display());

    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)?;
    let meta = builder.metadata();
    let file_meta = meta.file_metadata();

    let columns = builder
        .schema()
        .fields()
        .iter()
        .map(|f| (f.name().clone(), f.data_type().to_string()))
        .collect();

    let metadata = file_meta
        .key_value_metadata()
        .map(|kvs| {
            kvs.iter()
                .filter(|kv| !kv.key.starts_with("ARROW:"))
                .map(|kv| (kv.key.clone(), kv.value.clone().unwrap_or_default()))
                .collect()
        })
        .unwrap_or_default();

    Ok(TableSummary {
        path: path.to_path_buf(),
        rows: file_meta.num_rows(),
        row_groups: meta.num_row_groups(),
        columns,
        metadata,
        created_by: file_meta.created_by().map(str::to_string),
    })
}

/// Read every record batch of a parquet table
pub fn read_batches(path: impl AsRef<Path>) -> Result<Vec<RecordBatch>, OutputError> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(path.as_ref())?)?.build()?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    Ok(batches)
}
