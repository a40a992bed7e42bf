//! Engine-agnostic schema types.
//!
//! This module provides the types an origin uses to declare the columns it
//! guarantees to produce, without depending on any specific SQL engine.
//!
//! # Example
//!
//! ```rust
//! use lakefeed_core::schema::{ColumnDescriptor, ColumnKind, TableSchema};
//!
//! let schema = TableSchema::new(
//!     "iris",
//!     vec![
//!         ColumnDescriptor::new("sepal_length", ColumnKind::Float),
//!         ColumnDescriptor::new("species", ColumnKind::Integer),
//!     ],
//! )
//! .unwrap();
//! assert_eq!(schema.name(), "iris");
//! ```

mod column;
mod kind;
mod table;

pub use column::ColumnDescriptor;
pub use kind::ColumnKind;
pub use table::TableSchema;

/// Check that a string is a valid identifier: `[_a-zA-Z][_a-zA-Z0-9]*`.
///
/// Table and partition keys are used as physical table names and cache file
/// names, so they are restricted to this alphabet.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
