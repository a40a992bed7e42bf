//! The origin abstraction.
//!
//! An origin is a named external data source: it declares a schema,
//! enumerates the partitions covering a column request, fetches each
//! partition's raw payload, and parses that payload into a record batch.
//! Everything else (caching, conformance, concatenation) is handled by the
//! load pipeline in [`crate::loader`].

use std::collections::HashSet;

use arrow::array::RecordBatch;
use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::partition::Partition;
use crate::schema::TableSchema;

/// Raw content returned by a fetch, prior to parsing.
///
/// Remote origins typically return the downloaded bytes; bundled origins may
/// skip the byte stage entirely and hand back rows directly.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Raw byte payload (e.g. a downloaded CSV file).
    Bytes(Bytes),
    /// Already-tabular payload from an in-process source.
    Batch(RecordBatch),
}

/// Optional row-filter hint pushed down to partition selection.
///
/// Carries the display form of the filter expression. A returned partition
/// may legitimately include rows that do not match; filtering correctness
/// stays with the query engine, so origins are free to ignore this.
#[derive(Debug, Clone)]
pub struct Predicate {
    expression: String,
}

impl Predicate {
    /// Create a predicate hint from a filter expression's display form.
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
        }
    }

    /// The filter expression text.
    pub fn expression(&self) -> &str {
        &self.expression
    }
}

/// A named, queryable external data source.
///
/// Implementations must supply all four capabilities: schema declaration,
/// partition enumeration, fetch, and parse. Identity is the table name
/// ([`Origin::key`]): two origins with the same key are interchangeable.
///
/// `fetch` may perform network I/O and must be idempotent from the caller's
/// perspective; the pipeline does not retry, so a transient failure surfaces
/// to the caller of that load attempt.
#[async_trait]
pub trait Origin: Send + Sync {
    /// The schema this origin guarantees to produce.
    fn schema(&self) -> &TableSchema;

    /// Unique referencing key; cache namespace and materialized table name.
    fn key(&self) -> &str {
        self.schema().name()
    }

    /// Partitions whose union of columns covers the request.
    ///
    /// `predicate` is an efficiency hint only. Fails with
    /// [`crate::Error::NoSatisfyingPartition`] when the request is
    /// unanswerable from this origin.
    fn partitions(
        &self,
        columns: &HashSet<String>,
        predicate: Option<&Predicate>,
    ) -> Result<Vec<Partition>>;

    /// Retrieve the raw payload for a partition.
    async fn fetch(&self, partition: &Partition) -> Result<Payload>;

    /// Decode a fetched payload into a record batch.
    fn parse(&self, partition: &Partition, payload: Payload) -> Result<RecordBatch>;
}
