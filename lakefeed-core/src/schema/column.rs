//! Column descriptor for origin schemas.

use arrow::datatypes::Field;

use super::ColumnKind;

/// Engine-agnostic column definition.
///
/// Origins declare their schema in terms of these descriptors; the load
/// pipeline converts them to Arrow fields when conforming parsed payloads.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    /// Column name (snake_case, e.g. "sepal_length")
    pub name: String,

    /// Logical type
    pub kind: ColumnKind,

    /// Whether the column can be NULL
    pub nullable: bool,
}

impl ColumnDescriptor {
    /// Create a new non-nullable column.
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
        }
    }

    /// Create a new nullable column.
    pub fn nullable(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: true,
        }
    }

    /// Convert to an Arrow field.
    pub fn to_arrow(&self) -> Field {
        Field::new(self.name.clone(), self.kind.arrow_type(), self.nullable)
    }
}
