//! lakefeed-datafusion: SQL interface over lazily materialized datasets.
//!
//! This crate provides DataFusion integration for lakefeed:
//! - A column-pruning resolver over optimized logical plans
//! - Table providers for materialized origin data
//! - The [`Feed`] orchestrator tying resolution, loading, and SQL together
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lakefeed_datafusion::Feed;
//! use lakefeed_core::origins::iris;
//!
//! #[tokio::main]
//! async fn main() -> lakefeed_datafusion::Result<()> {
//!     let feed = Feed::builder()
//!         .origin(Arc::new(iris()?))?
//!         .build()?;
//!
//!     // The first query fetches, parses, and caches the origin data.
//!     let results = feed
//!         .query("SELECT species, avg(petal_length) FROM iris GROUP BY species")
//!         .await?;
//!     println!("{} result batches", results.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                       lakefeed-datafusion                           |
//! +---------------------------------------------------------------------+
//! |  feed      - Feed orchestrator: resolve, load, (re)materialize      |
//! |  columns   - required-column and predicate-hint extraction          |
//! |  provider  - MaterializedTable TableProvider                        |
//! |  error     - DataFusion-specific error types                        |
//! +---------------------------------------------------------------------+
//!                              |
//!                              v
//! +---------------------------------------------------------------------+
//! |                         lakefeed-core                               |
//! +---------------------------------------------------------------------+
//! |  Origins, partitions, schema conformance, fetch/parse, caching      |
//! +---------------------------------------------------------------------+
//! ```

pub mod columns;
pub mod error;
pub mod feed;
pub mod provider;

// Re-export core for convenience
pub use lakefeed_core;

// Re-export commonly used types
pub use columns::{required_columns, table_predicates};
pub use error::{Error, QueryError, Result};
pub use feed::{Feed, FeedBuilder};
pub use provider::MaterializedTable;
