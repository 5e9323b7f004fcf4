//! In-memory accumulation of decoded events until the end of the stream.

use crate::output::{write_table, OutputOptions, WrittenTable};
use crate::parser::schema::{BranchEvent, LoadStoreEvent};
use crate::utils::error::OutputError;
use log::info;

/// Ordered collections of decoded events, one per output table
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    load_stores: Vec<LoadStoreEvent>,
    branches: Vec<BranchEvent>,
}

impl EventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_load_store(&mut self, event: LoadStoreEvent) {
        self.load_stores.push(event);
    }

    pub fn push_branch(&mut self, event: BranchEvent) {
        self.branches.push(event);
    }

    /// Load/store events in trace order
    pub fn load_stores(&self) -> &[LoadStoreEvent] {
        &self.load_stores
    }

    /// Branch events in trace order
    pub fn branches(&self) -> &[BranchEvent] {
        &self.branches
    }

    pub fn len(&self) -> usize {
        self.load_stores.len() + self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hand both collections to the table writers
    ///
    /// **Public** - called once the whole trace has been decoded
    ///
    /// The branch table is written first. A table disabled in `options`
    /// produces no file.
    ///
    /// # Errors
    /// * `OutputError` - any failure creating or writing a table
    pub fn write(&self, options: &OutputOptions) -> Result<Vec<WrittenTable>, OutputError> {
        let mut written = Vec::with_capacity(2);

        if options.write_branch {
            written.push(write_table(&self.branches, options)?);
        }
        if options.write_load_store {
            written.push(write_table(&self.load_stores, options)?);
        }

        if written.is_empty() {
            info!("Both tables are disabled, no {} files written", options.format);
        } else {
            info!("SPE trace {} files created successfully", options.format);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_preserves_order() {
        let mut sink = EventSink::new();
        for ts in [30, 10, 20] {
            sink.push_branch(BranchEvent {
                ts,
                ..Default::default()
            });
        }
        sink.push_load_store(LoadStoreEvent::default());

        let order: Vec<i64> = sink.branches().iter().map(|b| b.ts).collect();
        assert_eq!(order, vec![30, 10, 20]);
        assert_eq!(sink.len(), 4);
        assert!(!sink.is_empty());
    }

    #[test]
    fn test_all_tables_disabled_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let options = OutputOptions {
            prefix: dir.path().join("spe").to_string_lossy().into_owned(),
            write_load_store: false,
            write_branch: false,
            ..Default::default()
        };

        let mut sink = EventSink::new();
        sink.push_branch(BranchEvent::default());
        let written = sink.write(&options).unwrap();

        assert!(written.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
