//! Low-level column data types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Data type tag carried by every column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    /// Boolean value.
    Boolean,
    /// 16-bit signed integer.
    SmallInt,
    /// 32-bit signed integer.
    Integer,
    /// 64-bit signed integer.
    BigInt,
    /// 32-bit floating point.
    Real,
    /// 64-bit floating point.
    Double,
    /// Fixed-precision decimal.
    Decimal {
        /// Total number of digits.
        precision: u8,
        /// Number of digits after decimal point.
        scale: u8,
    },
    /// Variable-length character data.
    Varchar,
    /// Variable-length binary data.
    VarBinary,
    /// Calendar date.
    Date,
    /// Timestamp without time zone.
    Timestamp,
    /// 128-bit identifier.
    Uuid,
}

impl SqlType {
    /// Check if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            SqlType::SmallInt
                | SqlType::Integer
                | SqlType::BigInt
                | SqlType::Real
                | SqlType::Double
                | SqlType::Decimal { .. }
        )
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::Boolean => write!(f, "BOOLEAN"),
            SqlType::SmallInt => write!(f, "SMALLINT"),
            SqlType::Integer => write!(f, "INTEGER"),
            SqlType::BigInt => write!(f, "BIGINT"),
            SqlType::Real => write!(f, "REAL"),
            SqlType::Double => write!(f, "DOUBLE"),
            SqlType::Decimal { precision, scale } => write!(f, "DECIMAL({precision},{scale})"),
            SqlType::Varchar => write!(f, "VARCHAR"),
            SqlType::VarBinary => write!(f, "VARBINARY"),
            SqlType::Date => write!(f, "DATE"),
            SqlType::Timestamp => write!(f, "TIMESTAMP"),
            SqlType::Uuid => write!(f, "UUID"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric() {
        assert!(SqlType::Integer.is_numeric());
        assert!(SqlType::Decimal {
            precision: 10,
            scale: 2
        }
        .is_numeric());
        assert!(!SqlType::Varchar.is_numeric());
    }

    #[test]
    fn test_display() {
        assert_eq!(SqlType::BigInt.to_string(), "BIGINT");
        assert_eq!(
            SqlType::Decimal {
                precision: 12,
                scale: 4
            }
            .to_string(),
            "DECIMAL(12,4)"
        );
    }
}
