//! Engine-agnostic logical column types.

use arrow::datatypes::{DataType, TimeUnit};

/// Logical types an origin can declare for its columns.
///
/// These are deliberately coarse: a payload column parsed as any integer or
/// float width is widened to the declared native type during conformance
/// (`Integer` -> `Int64`, `Float` -> `Float64`), everything else is carried
/// generically as a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Boolean (true/false)
    Bool,

    /// Signed 64-bit integer (target of all integer widening)
    Integer,

    /// 64-bit floating point (target of all float widening)
    Float,

    /// UTF-8 string (the generic carrier type)
    String,

    /// Timestamp with microsecond precision (UTC)
    TimestampMicros,
}

impl ColumnKind {
    /// Human-readable type name for display.
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnKind::Bool => "bool",
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::String => "string",
            ColumnKind::TimestampMicros => "timestamp",
        }
    }

    /// The native Arrow type this kind materializes as.
    pub fn arrow_type(&self) -> DataType {
        match self {
            ColumnKind::Bool => DataType::Boolean,
            ColumnKind::Integer => DataType::Int64,
            ColumnKind::Float => DataType::Float64,
            ColumnKind::String => DataType::Utf8,
            ColumnKind::TimestampMicros => DataType::Timestamp(TimeUnit::Microsecond, None),
        }
    }

    /// Whether this kind is a numeric widening target.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(ColumnKind::Bool.type_name(), "bool");
        assert_eq!(ColumnKind::Integer.type_name(), "integer");
        assert_eq!(ColumnKind::Float.type_name(), "float");
        assert_eq!(ColumnKind::String.type_name(), "string");
    }

    #[test]
    fn test_arrow_mapping() {
        assert_eq!(ColumnKind::Integer.arrow_type(), DataType::Int64);
        assert_eq!(ColumnKind::Float.arrow_type(), DataType::Float64);
        assert_eq!(ColumnKind::String.arrow_type(), DataType::Utf8);
        assert_eq!(
            ColumnKind::TimestampMicros.arrow_type(),
            DataType::Timestamp(TimeUnit::Microsecond, None)
        );
    }

    #[test]
    fn test_numeric() {
        assert!(ColumnKind::Integer.is_numeric());
        assert!(ColumnKind::Float.is_numeric());
        assert!(!ColumnKind::String.is_numeric());
        assert!(!ColumnKind::Bool.is_numeric());
    }
}
