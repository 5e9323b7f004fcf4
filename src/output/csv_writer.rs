//! CSV table writer.

use super::{ColumnarRecord, OutputOptions};
use crate::utils::error::OutputError;
use arrow::array::RecordBatch;
use arrow::csv::WriterBuilder;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write `records` to a CSV file with a header row
///
/// **Public** - called by `write_table` for `OutputFormat::Csv`
///
/// Column names and order are the same as the parquet schema.
pub fn write_csv<T: ColumnarRecord>(
    records: &[T],
    path: &Path,
    options: &OutputOptions,
) -> Result<(), OutputError> {
    let schema = T::schema();
    let file = BufWriter::new(File::create(path)?);
    let mut writer = WriterBuilder::new().with_header(true).build(file);

    if records.is_empty() {
        // header only
        writer.write(&RecordBatch::new_empty(schema))?;
    } else {
        let mut flushed = 0usize;
        for chunk in records.chunks(options.batch_size.max(1)) {
            let batch = T::build_batch(chunk, &schema)?;
            writer.write(&batch)?;
            flushed += batch.num_rows();
            info!("{} {} records have been flushed", flushed, T::TABLE);
        }
    }

    writer.into_inner().flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::LoadStoreEvent;
    use std::fs;

    #[test]
    fn test_empty_table_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty-ldst.csv");

        write_csv::<LoadStoreEvent>(&[], &path, &OutputOptions::default()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("cpu,op,pc,el,atomic,excl,ar,subclass"));
        assert_eq!(content.lines().count(), 1);
    }
}
