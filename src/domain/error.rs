//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::NodeId;

/// Domain errors raised by record parsing, forest building and tree operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown record type: {0}")]
    UnknownRecordType(String),

    #[error("no node matched the query")]
    NotFound,

    #[error("node {0} has no parent")]
    NoParent(NodeId),

    #[error("malformed record line: {line:?} ({reason})")]
    MalformedRecord { line: String, reason: String },

    #[error("field index {index} out of bounds for record with {len} fields")]
    FieldOutOfBounds { index: usize, len: usize },

    #[error("invalid field range {start}..{end} for record with {len} fields")]
    InvalidFieldRange { start: usize, end: usize, len: usize },

    #[error("record must keep at least one field")]
    EmptyRecord,

    #[error("stale node handle: {0}")]
    StaleNode(NodeId),

    #[error("inserting node {0} would create a cycle")]
    CycleDetected(NodeId),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
