//! Error types for lakefeed-datafusion.
//!
//! This module provides error types specific to the DataFusion integration,
//! while re-exporting core error types from lakefeed-core.

use thiserror::Error;

// Re-export core error types
pub use lakefeed_core::Error as CoreError;
pub use lakefeed_core::FetchError;

/// Main error type for lakefeed-datafusion operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from lakefeed-core (resolution, fetch, parse, cache)
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Error during SQL planning or execution
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to SQL planning and execution.
#[derive(Error, Debug)]
pub enum QueryError {
    /// SQL could not be parsed or planned
    #[error("SQL planning error: {0}")]
    Planning(String),

    /// DataFusion error during execution
    #[error("Query execution error: {0}")]
    Execution(String),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(String),
}

impl From<datafusion::error::DataFusionError> for QueryError {
    fn from(err: datafusion::error::DataFusionError) -> Self {
        QueryError::Execution(err.to_string())
    }
}

impl From<arrow::error::ArrowError> for QueryError {
    fn from(err: arrow::error::ArrowError) -> Self {
        QueryError::Arrow(err.to_string())
    }
}

impl From<datafusion::error::DataFusionError> for Error {
    fn from(err: datafusion::error::DataFusionError) -> Self {
        Error::Query(QueryError::from(err))
    }
}

impl From<arrow::error::ArrowError> for Error {
    fn from(err: arrow::error::ArrowError) -> Self {
        Error::Query(QueryError::from(err))
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
