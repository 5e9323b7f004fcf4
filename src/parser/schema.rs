//! Typed SPE events written to the output tables.
//!
//! Field names follow the column names of the output files; the two
//! fields whose Rust names differ are renamed for serde.

use serde::Serialize;

/// One sampled load or store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStoreEvent {
    pub cpu: i32,

    /// "LD" or "ST"
    pub op: String,

    pub pc: String,

    /// Exception level of the sampled instruction
    pub el: i32,

    pub atomic: bool,

    #[serde(rename = "excl")]
    pub exclusive: bool,

    /// Acquire/release semantics
    #[serde(rename = "ar")]
    pub acquire_release: bool,

    /// Register class (e.g. "GP-REG", "SIMD-FP"); empty for atomic,
    /// exclusive and acquire/release accesses
    pub subclass: String,

    /// Event flags joined with ':' (e.g. "RETIRED:L1D-ACCESS")
    pub event: String,

    pub issue_lat: i32,
    pub total_lat: i32,
    pub vaddr: String,
    pub xlat_lat: i32,
    pub paddr: String,
    pub data_source: String,
    pub ts: i64,
}

/// One sampled branch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BranchEvent {
    pub cpu: i32,
    pub op: String,
    pub pc: String,
    pub el: i32,

    #[serde(rename = "condition")]
    pub conditional: bool,

    pub indirect: bool,
    pub event: String,
    pub issue_lat: i32,
    pub total_lat: i32,

    #[serde(rename = "br_tgt")]
    pub target: String,

    #[serde(rename = "br_tgt_lvl")]
    pub target_el: i32,

    pub ts: i64,
}
