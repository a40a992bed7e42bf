//! DataFusion TableProvider for materialized origin data.

use std::any::Any;
use std::sync::Arc;

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use datafusion::catalog::Session;
use datafusion::datasource::{TableProvider, TableType};
use datafusion::error::Result as DFResult;
use datafusion::physical_plan::ExecutionPlan;
use datafusion::prelude::*;
use datafusion_datasource::memory::MemorySourceConfig;

/// A TableProvider over an origin's materialized partitions.
///
/// Before an origin's first load this holds only the declared schema (zero
/// batches), which is enough for SQL planning; after materialization it is
/// replaced wholesale with one carrying the loaded rows.
#[derive(Debug)]
pub struct MaterializedTable {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
}

impl MaterializedTable {
    /// Create a provider holding the given materialized batch.
    pub fn new(batch: RecordBatch) -> Self {
        Self {
            schema: batch.schema(),
            batches: vec![batch],
        }
    }

    /// Create a schema-only placeholder with no rows.
    pub fn empty(schema: SchemaRef) -> Self {
        Self {
            schema,
            batches: vec![],
        }
    }

    /// Total number of materialized rows.
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }
}

#[async_trait]
impl TableProvider for MaterializedTable {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    fn table_type(&self) -> TableType {
        TableType::Base
    }

    async fn scan(
        &self,
        _state: &dyn Session,
        projection: Option<&Vec<usize>>,
        _filters: &[Expr],
        _limit: Option<usize>,
    ) -> DFResult<Arc<dyn ExecutionPlan>> {
        let partitions = vec![self.batches.clone()];
        Ok(MemorySourceConfig::try_new_exec(
            &partitions,
            self.schema.clone(),
            projection.cloned(),
        )? as Arc<dyn ExecutionPlan>)
    }
}
