//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use crate::parser::classify::RecordKind;
use crate::parser::packet::PacketMap;
use thiserror::Error;

/// Errors raised while splitting a single dump line into packet tokens
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("invalid length of auxtrace line ({len} chars), skipping")]
    MalformedLine { len: usize },
}

/// Errors raised while turning a packet map into a typed event
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("invalid data source packet: [{0}]")]
    InvalidDataSource(String),

    #[error("invalid {packet} latency: {value:?}")]
    InvalidLatency { packet: &'static str, value: String },

    #[error("invalid br ops: {0}")]
    InvalidBranchOp(String),

    #[error("invalid spe packet {key} for {kind} record")]
    UnknownPacketKey { key: String, kind: RecordKind },

    #[error("invalid exception level in {packet} packet: {value:?}")]
    InvalidPrivilegeLevel { packet: &'static str, value: String },

    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("{packet} packet is missing its {field}")]
    MissingToken {
        packet: &'static str,
        field: &'static str,
    },

    #[error("not a {expected} record: {actual}")]
    WrongRecordKind {
        expected: &'static str,
        actual: RecordKind,
    },
}

/// Errors that stop the decode of a trace stream
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to read trace input: {0}")]
    Io(#[from] std::io::Error),

    #[error("trace ended in the middle of a record: {packets}")]
    TruncatedRecord { packets: PacketMap },

    #[error("invalid auxtrace record: {packets}")]
    UnknownRecord { packets: PacketMap },

    #[error("ambiguous auxtrace record, more than one of LD/ST/B present: {packets}")]
    AmbiguousRecord { packets: PacketMap },

    #[error("trace contains no Arm SPE data")]
    NoSession,

    #[error("invalid {kind} record: {source}, {packets}")]
    InvalidRecord {
        kind: RecordKind,
        packets: PacketMap,
        #[source]
        source: TranslateError,
    },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to build record batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("batch builder thread panicked while encoding {0} records")]
    WorkerPanicked(&'static str),
}
