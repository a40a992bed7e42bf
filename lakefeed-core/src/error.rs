//! Error types for lakefeed-core.
//!
//! This module provides structured error types for all lakefeed-core
//! operations:
//!
//! - [`enum@Error`] - Main error enum covering the resolution and load pipeline
//! - [`FetchError`] - Transport errors raised while retrieving a payload
//!
//! All errors implement `std::error::Error` and compose through `?`
//! conversions.

use thiserror::Error;

/// Main error type for lakefeed-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A query references a table with no registered origin
    #[error("No origin registered for table '{table}'")]
    UnresolvableOrigin { table: String },

    /// No declared partition covers the requested columns
    #[error("No partition of '{origin}' satisfies the column requirement: {columns:?}")]
    NoSatisfyingPartition {
        origin: String,
        columns: Vec<String>,
    },

    /// Parsed payload does not conform to the origin's declared schema
    #[error("Schema mismatch in '{origin}': unexpected column(s) {columns:?}")]
    SchemaMismatch {
        origin: String,
        columns: Vec<String>,
    },

    /// A column could not be cast to its declared type
    #[error("Cannot cast column '{column}' of '{origin}' to {target}: {reason}")]
    Cast {
        origin: String,
        column: String,
        target: String,
        reason: String,
    },

    /// An origin with the same table name is already registered
    #[error("Origin already registered for table '{table}'")]
    DuplicateOrigin { table: String },

    /// A key is not usable as a table or partition identifier
    #[error("Invalid identifier '{name}': must match [_a-zA-Z][_a-zA-Z0-9]*")]
    InvalidIdentifier { name: String },

    /// Transport error while retrieving a partition payload
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Error decoding a payload into a record batch
    #[error("Parse error for '{origin}:{partition}': {reason}")]
    Parse {
        origin: String,
        partition: String,
        reason: String,
    },

    /// Arrow error (decoding, casting, concatenation)
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet error while reading or writing a cache entry
    #[error("Cache serialization error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Filesystem error in the cache directory
    #[error("Cache I/O error: {0}")]
    CacheIo(#[from] std::io::Error),
}

/// Errors raised by an origin's `fetch` implementation.
///
/// Retry policy, if any, belongs to the specific origin; the pipeline
/// propagates these as-is.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Object store error (local filesystem, S3, GCS, ...)
    #[error("Object store error for '{origin}:{partition}': {source}")]
    ObjectStore {
        origin: String,
        partition: String,
        #[source]
        source: object_store::Error,
    },

    /// Any other origin-specific transport failure
    #[error("Fetch failed for '{origin}:{partition}': {reason}")]
    Other {
        origin: String,
        partition: String,
        reason: String,
    },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
