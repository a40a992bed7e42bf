//! Origins over datasets bundled with the crate.
//!
//! Useful for demos and tests: no network access, no credentials. Each
//! bundled dataset is a single implicit `full` partition whose payload is
//! embedded CSV text.

use std::collections::HashSet;

use arrow::array::RecordBatch;
use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::origin::{Origin, Payload, Predicate};
use crate::parser::{parse_csv, CsvOptions};
use crate::partition::Partition;
use crate::schema::{ColumnDescriptor, ColumnKind, TableSchema};

/// An origin serving a dataset embedded in the binary as CSV text.
///
/// There is no sub-partitioning: `partitions` always returns the single
/// implicit `full` partition covering every declared column.
pub struct BundledCsvOrigin {
    schema: TableSchema,
    text: &'static [u8],
    options: CsvOptions,
}

impl BundledCsvOrigin {
    /// Create a bundled origin from a schema and embedded CSV text.
    pub fn new(schema: TableSchema, text: &'static [u8]) -> Self {
        Self {
            schema,
            text,
            options: CsvOptions::default(),
        }
    }

    /// Override the CSV decoding options.
    pub fn with_options(mut self, options: CsvOptions) -> Self {
        self.options = options;
        self
    }
}

#[async_trait]
impl Origin for BundledCsvOrigin {
    fn schema(&self) -> &TableSchema {
        &self.schema
    }

    fn partitions(
        &self,
        _columns: &HashSet<String>,
        _predicate: Option<&Predicate>,
    ) -> Result<Vec<Partition>> {
        Ok(vec![Partition::full(
            self.schema.column_names().into_iter().map(str::to_string),
        )])
    }

    async fn fetch(&self, _partition: &Partition) -> Result<Payload> {
        Ok(Payload::Bytes(Bytes::from_static(self.text)))
    }

    fn parse(&self, _partition: &Partition, payload: Payload) -> Result<RecordBatch> {
        match payload {
            Payload::Bytes(bytes) => parse_csv(&bytes, &self.options),
            Payload::Batch(batch) => Ok(batch),
        }
    }
}

/// The classic Iris dataset: 150 rows, four measurements and a class target.
pub fn iris() -> Result<BundledCsvOrigin> {
    let schema = TableSchema::new(
        "iris",
        vec![
            ColumnDescriptor::new("sepal_length", ColumnKind::Float),
            ColumnDescriptor::new("sepal_width", ColumnKind::Float),
            ColumnDescriptor::new("petal_length", ColumnKind::Float),
            ColumnDescriptor::new("petal_width", ColumnKind::Float),
            ColumnDescriptor::new("species", ColumnKind::Integer),
        ],
    )?;
    Ok(BundledCsvOrigin::new(
        schema,
        include_bytes!("data/iris.csv"),
    ))
}
