//! # lakefeed-core
//!
//! Engine-agnostic lazy dataset materialization.
//!
//! This crate provides the core of lakefeed without any SQL engine
//! dependencies: the [`Origin`] abstraction over external partitioned data
//! sources, and the fetch/parse/cache pipeline that turns a column request
//! into locally cached Arrow record batches. SQL integrations (DataFusion)
//! build on top of it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lakefeed_core::origins::iris;
//! use lakefeed_core::{Origin, OriginLoader};
//!
//! # async fn run() -> lakefeed_core::Result<()> {
//! let origin = iris()?;
//! let loader = OriginLoader::with_default_root()?;
//!
//! // Which partitions cover the requested columns?
//! let requested: std::collections::HashSet<String> =
//!     ["sepal_length".to_string(), "species".to_string()].into();
//! let partitions = origin.partitions(&requested, None)?;
//!
//! // Fetch, parse, conform and cache; repeated loads hit the cache.
//! let batch = loader.load(&origin, &partitions).await?;
//! assert_eq!(batch.num_rows(), 150);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                         lakefeed-core                               |
//! +---------------------------------------------------------------------+
//! |  schema/     - TableSchema, ColumnDescriptor, ColumnKind            |
//! |  partition   - Partition identity, first-superset selection         |
//! |  origin      - Origin trait, Payload, Predicate                     |
//! |  parser      - delimited-text decoding (CSV -> RecordBatch)         |
//! |  cache       - content-addressed parquet store, SHA-256 digests     |
//! |  loader      - fetch/parse/cache pipeline, schema conformance       |
//! |  registry    - table name -> Origin, availability filtering         |
//! |  origins/    - bundled datasets, object-store CSV files             |
//! |  error       - Error types                                          |
//! +---------------------------------------------------------------------+
//! ```
//!
//! Data flow: a query layer asks each origin for the partitions covering its
//! referenced columns, loads each uncached partition through
//! fetch -> parse -> conform -> cache, concatenates them in declared order,
//! and materializes the result under the origin's table name.

pub mod cache;
pub mod error;
pub mod loader;
pub mod origin;
pub mod origins;
pub mod parser;
pub mod partition;
pub mod registry;
pub mod schema;

// Re-export commonly used types at crate root for convenience
pub use error::{Error, FetchError, Result};
pub use loader::{conform_batch, OriginLoader};
pub use origin::{Origin, Payload, Predicate};
pub use parser::{parse_csv, CsvOptions};
pub use partition::{first_covering, Partition, FULL_PARTITION_KEY};
pub use registry::OriginRegistry;
pub use schema::{is_identifier, ColumnDescriptor, ColumnKind, TableSchema};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
