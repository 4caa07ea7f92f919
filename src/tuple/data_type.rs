use std::fmt;

use crate::common::{MAX_DECIMAL_PRECISION, UNINLINEABLE_OBJECT_LENGTH};

/// Represents the column types a tuple can store.
/// Each type has a fixed in-tuple width or is variable-length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Boolean type: 1 byte (0 = false, 1 = true)
    Boolean,

    /// 8-bit signed integer: 1 byte
    TinyInt,

    /// 16-bit signed integer: 2 bytes, little-endian
    SmallInt,

    /// 32-bit signed integer: 4 bytes, little-endian
    Integer,

    /// 64-bit signed integer: 8 bytes, little-endian
    BigInt,

    /// 64-bit floating point: 8 bytes, IEEE 754
    Double,

    /// Timestamp: 8 bytes, microseconds since Unix epoch
    Timestamp,

    /// Fixed-point decimal: 16 bytes, scale 12
    Decimal,

    /// Variable-length character string of up to n bytes
    VarChar(u16),

    /// Variable-length byte string of up to n bytes
    VarBinary(u16),
}

impl DataType {
    /// Returns true for the string and binary types.
    pub fn is_variable_length(&self) -> bool {
        matches!(self, DataType::VarChar(_) | DataType::VarBinary(_))
    }

    /// Returns the fixed size in bytes, or None for variable-length types.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            DataType::Boolean => Some(1),
            DataType::TinyInt => Some(1),
            DataType::SmallInt => Some(2),
            DataType::Integer => Some(4),
            DataType::BigInt => Some(8),
            DataType::Double => Some(8),
            DataType::Timestamp => Some(8),
            DataType::Decimal => Some(16),
            DataType::VarChar(_) | DataType::VarBinary(_) => None,
        }
    }

    /// Returns the declared maximum length of a variable-length type.
    pub fn max_length(&self) -> Option<usize> {
        match self {
            DataType::VarChar(n) | DataType::VarBinary(n) => Some(*n as usize),
            _ => None,
        }
    }

    /// Returns true if a column of this type may be stored inline in the
    /// tuple under a schema that allows inlined objects.
    pub fn is_inlinable(&self) -> bool {
        match self.max_length() {
            Some(n) => n < UNINLINEABLE_OBJECT_LENGTH,
            None => true,
        }
    }

    /// Returns the fixed width of this type in the export encoding, or None
    /// for variable-length types whose width depends on the value.
    ///
    /// Boolean has no export encoding.
    pub fn export_width(&self) -> Option<usize> {
        match self {
            DataType::TinyInt
            | DataType::SmallInt
            | DataType::Integer
            | DataType::BigInt
            | DataType::Timestamp
            | DataType::Double => Some(8),
            // 32 bits of length + max precision digits + radix point + sign
            DataType::Decimal => Some(4 + MAX_DECIMAL_PRECISION + 1 + 1),
            _ => None,
        }
    }

    /// Returns true if values of this type have an export encoding.
    pub fn is_exportable(&self) -> bool {
        self.export_width().is_some() || self.is_variable_length()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Boolean => write!(f, "BOOLEAN"),
            DataType::TinyInt => write!(f, "TINYINT"),
            DataType::SmallInt => write!(f, "SMALLINT"),
            DataType::Integer => write!(f, "INTEGER"),
            DataType::BigInt => write!(f, "BIGINT"),
            DataType::Double => write!(f, "DOUBLE"),
            DataType::Timestamp => write!(f, "TIMESTAMP"),
            DataType::Decimal => write!(f, "DECIMAL"),
            DataType::VarChar(n) => write!(f, "VARCHAR({})", n),
            DataType::VarBinary(n) => write!(f, "VARBINARY({})", n),
        }
    }
}
