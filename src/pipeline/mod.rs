//! Decode pipeline: decoder → translators → sink.

pub mod run;

pub use run::{decode_into, DecodeStats};
