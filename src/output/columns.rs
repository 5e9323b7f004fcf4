//! Arrow schemas of the output tables and record batch builders.

use super::TableKind;
use crate::parser::schema::{BranchEvent, LoadStoreEvent};
use arrow::array::{BooleanBuilder, Int32Builder, Int64Builder, RecordBatch, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;
use std::sync::Arc;

/// An event type that can be laid out as a table
pub trait ColumnarRecord: Sized {
    const TABLE: TableKind;

    fn schema() -> SchemaRef;

    /// Build one record batch from a slice of events, preserving order
    fn build_batch(records: &[Self], schema: &SchemaRef) -> Result<RecordBatch, ArrowError>;
}

/// Schema for the `-ldst` table
pub fn load_store_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("cpu", DataType::Int32, false),
        Field::new("op", DataType::Utf8, false),
        Field::new("pc", DataType::Utf8, false),
        Field::new("el", DataType::Int32, false),
        Field::new("atomic", DataType::Boolean, false),
        Field::new("excl", DataType::Boolean, false),
        Field::new("ar", DataType::Boolean, false),
        Field::new("subclass", DataType::Utf8, false),
        Field::new("event", DataType::Utf8, false),
        Field::new("issue_lat", DataType::Int32, false),
        Field::new("total_lat", DataType::Int32, false),
        Field::new("vaddr", DataType::Utf8, false),
        Field::new("xlat_lat", DataType::Int32, false),
        Field::new("paddr", DataType::Utf8, false),
        Field::new("data_source", DataType::Utf8, false),
        Field::new("ts", DataType::Int64, false),
    ]))
}

/// Schema for the `-br` table
pub fn branch_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("cpu", DataType::Int32, false),
        Field::new("op", DataType::Utf8, false),
        Field::new("pc", DataType::Utf8, false),
        Field::new("el", DataType::Int32, false),
        Field::new("condition", DataType::Boolean, false),
        Field::new("indirect", DataType::Boolean, false),
        Field::new("event", DataType::Utf8, false),
        Field::new("issue_lat", DataType::Int32, false),
        Field::new("total_lat", DataType::Int32, false),
        Field::new("br_tgt", DataType::Utf8, false),
        Field::new("br_tgt_lvl", DataType::Int32, false),
        Field::new("ts", DataType::Int64, false),
    ]))
}

impl ColumnarRecord for LoadStoreEvent {
    const TABLE: TableKind = TableKind::LoadStore;

    fn schema() -> SchemaRef {
        load_store_schema()
    }

    fn build_batch(records: &[Self], schema: &SchemaRef) -> Result<RecordBatch, ArrowError> {
        let n = records.len();
        let mut cpu = Int32Builder::with_capacity(n);
        let mut op = StringBuilder::with_capacity(n, n * 2);
        let mut pc = StringBuilder::with_capacity(n, n * 18);
        let mut el = Int32Builder::with_capacity(n);
        let mut atomic = BooleanBuilder::with_capacity(n);
        let mut excl = BooleanBuilder::with_capacity(n);
        let mut ar = BooleanBuilder::with_capacity(n);
        let mut subclass = StringBuilder::with_capacity(n, n * 8);
        let mut event = StringBuilder::with_capacity(n, n * 32);
        let mut issue_lat = Int32Builder::with_capacity(n);
        let mut total_lat = Int32Builder::with_capacity(n);
        let mut vaddr = StringBuilder::with_capacity(n, n * 18);
        let mut xlat_lat = Int32Builder::with_capacity(n);
        let mut paddr = StringBuilder::with_capacity(n, n * 18);
        let mut data_source = StringBuilder::with_capacity(n, n * 8);
        let mut ts = Int64Builder::with_capacity(n);

        for r in records {
            cpu.append_value(r.cpu);
            op.append_value(&r.op);
            pc.append_value(&r.pc);
            el.append_value(r.el);
            atomic.append_value(r.atomic);
            excl.append_value(r.exclusive);
            ar.append_value(r.acquire_release);
            subclass.append_value(&r.subclass);
            event.append_value(&r.event);
            issue_lat.append_value(r.issue_lat);
            total_lat.append_value(r.total_lat);
            vaddr.append_value(&r.vaddr);
            xlat_lat.append_value(r.xlat_lat);
            paddr.append_value(&r.paddr);
            data_source.append_value(&r.data_source);
            ts.append_value(r.ts);
        }

        RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(cpu.finish()),
                Arc::new(op.finish()),
                Arc::new(pc.finish()),
                Arc::new(el.finish()),
                Arc::new(atomic.finish()),
                Arc::new(excl.finish()),
                Arc::new(ar.finish()),
                Arc::new(subclass.finish()),
                Arc::new(event.finish()),
                Arc::new(issue_lat.finish()),
                Arc::new(total_lat.finish()),
                Arc::new(vaddr.finish()),
                Arc::new(xlat_lat.finish()),
                Arc::new(paddr.finish()),
                Arc::new(data_source.finish()),
                Arc::new(ts.finish()),
            ],
        )
    }
}

impl ColumnarRecord for BranchEvent {
    const TABLE: TableKind = TableKind::Branch;

    fn schema() -> SchemaRef {
        branch_schema()
    }

    fn build_batch(records: &[Self], schema: &SchemaRef) -> Result<RecordBatch, ArrowError> {
        let n = records.len();
        let mut cpu = Int32Builder::with_capacity(n);
        let mut op = StringBuilder::with_capacity(n, n);
        let mut pc = StringBuilder::with_capacity(n, n * 18);
        let mut el = Int32Builder::with_capacity(n);
        let mut condition = BooleanBuilder::with_capacity(n);
        let mut indirect = BooleanBuilder::with_capacity(n);
        let mut event = StringBuilder::with_capacity(n, n * 32);
        let mut issue_lat = Int32Builder::with_capacity(n);
        let mut total_lat = Int32Builder::with_capacity(n);
        let mut br_tgt = StringBuilder::with_capacity(n, n * 18);
        let mut br_tgt_lvl = Int32Builder::with_capacity(n);
        let mut ts = Int64Builder::with_capacity(n);

        for r in records {
            cpu.append_value(r.cpu);
            op.append_value(&r.op);
            pc.append_value(&r.pc);
            el.append_value(r.el);
            condition.append_value(r.conditional);
            indirect.append_value(r.indirect);
            event.append_value(&r.event);
            issue_lat.append_value(r.issue_lat);
            total_lat.append_value(r.total_lat);
            br_tgt.append_value(&r.target);
            br_tgt_lvl.append_value(r.target_el);
            ts.append_value(r.ts);
        }

        RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(cpu.finish()),
                Arc::new(op.finish()),
                Arc::new(pc.finish()),
                Arc::new(el.finish()),
                Arc::new(condition.finish()),
                Arc::new(indirect.finish()),
                Arc::new(event.finish()),
                Arc::new(issue_lat.finish()),
                Arc::new(total_lat.finish()),
                Arc::new(br_tgt.finish()),
                Arc::new(br_tgt_lvl.finish()),
                Arc::new(ts.finish()),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::AsArray;
    use arrow::datatypes::Int64Type;

    #[test]
    fn test_load_store_batch_matches_schema() {
        let events = vec![
            LoadStoreEvent {
                op: "LD".to_string(),
                ts: 5,
                ..Default::default()
            },
            LoadStoreEvent {
                op: "ST".to_string(),
                ts: 6,
                ..Default::default()
            },
        ];
        let schema = load_store_schema();
        let batch = LoadStoreEvent::build_batch(&events, &schema).unwrap();

        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), schema.fields().len());
        let ops = batch.column_by_name("op").unwrap().as_string::<i32>();
        assert_eq!(ops.value(1), "ST");
        let ts = batch.column_by_name("ts").unwrap().as_primitive::<Int64Type>();
        assert_eq!(ts.value(0), 5);
    }

    #[test]
    fn test_branch_schema_columns() {
        let names: Vec<String> = branch_schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        assert_eq!(
            names,
            vec![
                "cpu", "op", "pc", "el", "condition", "indirect", "event", "issue_lat",
                "total_lat", "br_tgt", "br_tgt_lvl", "ts"
            ]
        );
    }
}
