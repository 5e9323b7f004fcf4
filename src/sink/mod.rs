//! Batch sink between the decoder and the table writers.
//!
//! Events are held in memory in arrival order and written out in one pass
//! once the trace is fully decoded.

pub mod batch;

pub use batch::EventSink;
