//! Parquet table writer.
//!
//! Events are cut into batches of `batch_size` rows. Up to `concurrency`
//! batches are built on scoped threads at a time, then appended to the file
//! in their original order, one row group per batch.

use super::{ColumnarRecord, CompressionCodec, OutputOptions, TableKind};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use arrow::array::RecordBatch;
use arrow::datatypes::SchemaRef;
use chrono::Utc;
use log::{debug, info};
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use parquet::format::KeyValue;
use std::fs::File;
use std::path::Path;
use std::thread;

pub const META_SCHEMA_VERSION: &str = "spe_parser.schema_version";
pub const META_TABLE: &str = "spe_parser.table";
pub const META_CREATED_AT: &str = "spe_parser.created_at";

/// Write `records` to a parquet file at `path`
///
/// **Public** - called by `write_table` for `OutputFormat::Parquet`
///
/// # Errors
/// * `OutputError::Io` - file cannot be created
/// * `OutputError::Arrow` / `Parquet` - encoding failure
/// * `OutputError::WorkerPanicked` - a batch builder thread panicked
pub fn write_parquet<T: ColumnarRecord + Sync>(
    records: &[T],
    path: &Path,
    options: &OutputOptions,
) -> Result<(), OutputError> {
    let schema = T::schema();
    let batch_size = options.batch_size.max(1);
    let concurrency = options.concurrency.max(1);

    let props = writer_properties(T::TABLE, options.compression, batch_size);
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

    let chunks: Vec<&[T]> = records.chunks(batch_size).collect();
    let mut flushed = 0usize;

    for wave in chunks.chunks(concurrency) {
        for batch in build_batches::<T>(wave, &schema)? {
            writer.write(&batch)?;
            writer.flush()?;
            flushed += batch.num_rows();
            info!("{} {} records have been flushed", flushed, T::TABLE);
        }
    }

    let meta = writer.close()?;
    debug!(
        "Closed {}: {} rows in {} row groups",
        path.display(),
        meta.num_rows,
        meta.row_groups.len()
    );
    Ok(())
}

fn writer_properties(
    table: TableKind,
    codec: CompressionCodec,
    row_group_size: usize,
) -> WriterProperties {
    WriterProperties::builder()
        .set_compression(codec.to_parquet())
        .set_max_row_group_size(row_group_size)
        .set_created_by(format!("spe-parser version {}", env!("CARGO_PKG_VERSION")))
        .set_key_value_metadata(Some(vec![
            KeyValue::new(META_SCHEMA_VERSION.to_string(), SCHEMA_VERSION.to_string()),
            KeyValue::new(META_TABLE.to_string(), table.suffix().to_string()),
            KeyValue::new(META_CREATED_AT.to_string(), Utc::now().to_rfc3339()),
        ]))
        .build()
}

/// Build one record batch per chunk, in chunk order
///
/// **Private** - a single chunk is built on the calling thread
fn build_batches<T: ColumnarRecord + Sync>(
    wave: &[&[T]],
    schema: &SchemaRef,
) -> Result<Vec<RecordBatch>, OutputError> {
    if let [chunk] = wave {
        return Ok(vec![T::build_batch(chunk, schema)?]);
    }

    thread::scope(|scope| {
        let handles: Vec<_> = wave
            .iter()
            .map(|chunk| scope.spawn(move || T::build_batch(chunk, schema)))
            .collect();

        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(batch) => batch.map_err(OutputError::from),
                Err(_) => Err(OutputError::WorkerPanicked(T::TABLE.name())),
            })
            .collect()
    })
}
