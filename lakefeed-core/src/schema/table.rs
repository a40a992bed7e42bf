//! Table schema declared by an origin.

use std::collections::HashSet;
use std::sync::Arc;

use arrow::datatypes::{Schema, SchemaRef};

use crate::error::{Error, Result};

use super::{is_identifier, ColumnDescriptor};

/// The ordered, named, typed column set an origin guarantees to produce.
///
/// The table name doubles as the origin's cache namespace and as the physical
/// table name in the query surface, so it must be a valid identifier.
/// Immutable for the origin's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    name: String,
    columns: Vec<ColumnDescriptor>,
}

impl TableSchema {
    /// Create a new table schema, validating the name as an identifier.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDescriptor>) -> Result<Self> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(Error::InvalidIdentifier { name });
        }
        Ok(Self { name, columns })
    }

    /// Table name; used as the materialized table name and cache namespace.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared columns, in order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The set of declared column names.
    pub fn column_names(&self) -> HashSet<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Convert to an Arrow schema.
    pub fn to_arrow(&self) -> SchemaRef {
        Arc::new(Schema::new(
            self.columns
                .iter()
                .map(ColumnDescriptor::to_arrow)
                .collect::<Vec<_>>(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::super::ColumnKind;
    use super::*;

    fn iris_columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("sepal_length", ColumnKind::Float),
            ColumnDescriptor::new("sepal_width", ColumnKind::Float),
            ColumnDescriptor::new("species", ColumnKind::Integer),
        ]
    }

    #[test]
    fn test_schema_creation() {
        let schema = TableSchema::new("iris", iris_columns()).unwrap();
        assert_eq!(schema.name(), "iris");
        assert_eq!(schema.columns().len(), 3);
        assert!(schema.column("species").is_some());
        assert!(schema.column("petal_length").is_none());
    }

    #[test]
    fn test_invalid_name_rejected() {
        let err = TableSchema::new("1iris", iris_columns()).unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier { .. }));

        let err = TableSchema::new("iris flowers", iris_columns()).unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier { .. }));
    }

    #[test]
    fn test_column_names() {
        let schema = TableSchema::new("iris", iris_columns()).unwrap();
        let names = schema.column_names();
        assert!(names.contains("sepal_length"));
        assert!(names.contains("species"));
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_arrow_conversion() {
        let schema = TableSchema::new("iris", iris_columns()).unwrap();
        let arrow = schema.to_arrow();
        assert_eq!(arrow.fields().len(), 3);
        assert_eq!(arrow.field(0).name(), "sepal_length");
    }
}
