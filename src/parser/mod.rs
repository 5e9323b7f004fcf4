//! SPE dump parsing and event schema definitions.
//!
//! This module handles:
//! - Tokenizing `perf script -D` packet lines
//! - Tracking SPE sessions and their CPU
//! - Assembling packets into records and classifying them
//! - Defining the typed output events

pub mod accumulator;
pub mod classify;
pub mod decoder;
pub mod packet;
pub mod schema;
pub mod session;
pub mod tokenizer;

// Re-export main types
pub use accumulator::{PacketAccumulator, PushOutcome};
pub use classify::{classify, RecordKind};
pub use decoder::{DecoderStats, TraceDecoder, TraceRecord};
pub use packet::{PacketKind, PacketMap};
pub use schema::{BranchEvent, LoadStoreEvent};
pub use session::{ScanEvent, SessionScanner, SessionState};
pub use tokenizer::tokenize;
