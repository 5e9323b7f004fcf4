//! SPE Parser
//!
//! Decodes Arm Statistical Profiling Extension (SPE) samples from the text
//! dump printed by `perf script -D` and writes them as columnar tables.
//!
//! This crate provides the core implementation for the
//! `spe-parser` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! perf record -e arm_spe_0// -- ./workload
//! perf script -D > perf.txt
//! spe-parser convert -f perf.txt -p out/spe
//! ```
//!
//! Library users drive [`pipeline::decode_into`] over any `BufRead` and hand
//! the filled [`sink::EventSink`] to the writers in [`output`].

pub mod commands;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod sink;
pub mod translate;
pub mod utils;
