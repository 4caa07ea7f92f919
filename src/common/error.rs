use thiserror::Error;

use super::types::ObjectRef;
use crate::tuple::DataType;

/// Row storage error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TupleError {
    #[error("Column index {index} out of range for {count} columns")]
    ColumnOutOfRange { index: usize, count: usize },

    #[error("Tuple buffer is {actual} bytes, schema requires {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("Tuples are not compatible for copy: {0}")]
    IncompatibleSchemas(String),

    #[error("Operation requires both tuples to share the same schema layout")]
    SchemaMismatch,

    #[error("Cannot cast {from} to {to}")]
    InvalidCast { from: String, to: DataType },

    #[error("Value of {length} bytes exceeds width {max} of column {column}")]
    ValueTooWide {
        column: usize,
        length: usize,
        max: usize,
    },

    #[error("Column {column} is stored out of line but the value has no object to reference")]
    UnbackedObject { column: usize },

    #[error("Object {0} has already been released")]
    StaleObject(ObjectRef),

    #[error("Unknown ValueType {0} found during Export serialization")]
    UnsupportedExportType(DataType),

    #[error("Cannot compare {left} with {right}")]
    Incomparable { left: String, right: String },

    #[error("Input truncated: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("Corrupt tuple data: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, TupleError>;
