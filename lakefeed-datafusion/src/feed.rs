//! The lazily-materializing feed.
//!
//! A [`Feed`] owns a DataFusion session whose tables are backed by
//! registered origins. Tables start as schema-only placeholders; before a
//! query runs, [`Feed::ensure_loaded`] resolves which columns the query
//! references, asks each origin for the covering partitions, loads them
//! through the cache pipeline, and (re)materializes the table - but only
//! when the required partition set actually changed since the last load.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use arrow::array::RecordBatch;
use datafusion::prelude::SessionContext;
use tokio::sync::Mutex;
use tracing::{debug, info};

use lakefeed_core::{Origin, OriginLoader, OriginRegistry};

use crate::columns::{required_columns, table_predicates};
use crate::error::{CoreError, Error, QueryError, Result};
use crate::provider::MaterializedTable;

/// Builder for [`Feed`].
#[derive(Default)]
pub struct FeedBuilder {
    registry: OriginRegistry,
    cache_root: Option<PathBuf>,
}

impl FeedBuilder {
    /// Register an origin with the feed.
    pub fn origin(mut self, origin: Arc<dyn Origin>) -> Result<Self> {
        self.registry.register(origin).map_err(Error::Core)?;
        Ok(self)
    }

    /// Register an origin that may have failed to initialize.
    ///
    /// Unavailable origins are excluded with a warning; queries against
    /// their tables fail with `UnresolvableOrigin`.
    pub fn origin_if_available(
        mut self,
        origin: lakefeed_core::Result<Arc<dyn Origin>>,
    ) -> Result<Self> {
        self.registry
            .register_available(origin)
            .map_err(Error::Core)?;
        Ok(self)
    }

    /// Override the cache root directory.
    pub fn cache_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_root = Some(path.into());
        self
    }

    /// Build the feed, registering a schema-only table per origin.
    pub fn build(self) -> Result<Feed> {
        let loader = match self.cache_root {
            Some(root) => OriginLoader::new(root),
            None => OriginLoader::with_default_root().map_err(Error::Core)?,
        };
        Feed::try_new(self.registry, loader)
    }
}

/// A feed of lazily materialized external datasets, queryable through SQL.
pub struct Feed {
    ctx: SessionContext,
    /// Planning-only context whose tables always carry the full declared
    /// schemas. Materialized tables may hold a column subset (the selected
    /// partition's columns), so resolution must not plan against them.
    planner: SessionContext,
    registry: OriginRegistry,
    loader: OriginLoader,
    /// Last-loaded partition keys per origin table. Each table's lock is
    /// held across the whole check-load-register-update sequence, so
    /// concurrent loads of one table serialize and the recorded keys always
    /// match the registered table's contents.
    loaded: HashMap<String, Mutex<Option<HashSet<String>>>>,
}

impl Feed {
    /// Start building a feed.
    pub fn builder() -> FeedBuilder {
        FeedBuilder::default()
    }

    fn try_new(registry: OriginRegistry, loader: OriginLoader) -> Result<Feed> {
        let ctx = SessionContext::new();
        let planner = SessionContext::new();

        // Schema-only placeholders let SQL planning succeed before any
        // origin has been materialized. The planner keeps its declared-schema
        // copies forever; the execution context replaces its copies as
        // partitions materialize.
        let mut loaded = HashMap::new();
        for (table, origin) in registry.iter() {
            let arrow_schema = origin.schema().to_arrow();
            ctx.register_table(
                table,
                Arc::new(MaterializedTable::empty(arrow_schema.clone())),
            )?;
            planner.register_table(table, Arc::new(MaterializedTable::empty(arrow_schema)))?;
            loaded.insert(table.to_string(), Mutex::new(None));
        }

        Ok(Feed {
            ctx,
            planner,
            registry,
            loader,
            loaded,
        })
    }

    /// Materialize every origin the query needs, then hand back.
    ///
    /// Must be called before executing `sql` against [`Feed::context`];
    /// [`Feed::query`] does both. Idempotent per partition set: a repeated
    /// call with the same requirements performs no writes. Concurrent calls
    /// needing the same table serialize on that table's load lock.
    pub async fn ensure_loaded(&self, sql: &str) -> Result<()> {
        let state = self.planner.state();
        let statement = state
            .sql_to_statement(sql, "generic")
            .map_err(QueryError::from)?;

        let mut referenced: Vec<String> = Vec::new();
        for table_ref in state
            .resolve_table_references(&statement)
            .map_err(QueryError::from)?
        {
            let table = table_ref.table().to_string();
            if !self.registry.contains(&table) {
                return Err(Error::Core(CoreError::UnresolvableOrigin { table }));
            }
            if !referenced.contains(&table) {
                referenced.push(table);
            }
        }

        let plan = state.statement_to_plan(statement).await?;
        let plan = state.optimize(&plan)?;
        let groups = required_columns(&plan);
        let hints = table_predicates(&plan);

        for table in referenced {
            let origin = self
                .registry
                .get(&table)
                .ok_or_else(|| CoreError::UnresolvableOrigin {
                    table: table.clone(),
                })?;
            let columns = groups.get(&table).cloned().unwrap_or_default();
            let partitions = origin
                .partitions(&columns, hints.get(&table))
                .map_err(Error::Core)?;
            let keys: HashSet<String> = partitions.iter().map(|p| p.key().to_string()).collect();

            let slot = self
                .loaded
                .get(&table)
                .ok_or_else(|| CoreError::UnresolvableOrigin {
                    table: table.clone(),
                })?;
            // The lock spans check, load, re-registration, and bookkeeping:
            // a concurrent load of the same table cannot interleave between
            // the replaced table and the recorded partition set.
            let mut state = slot.lock().await;

            // Symmetric-difference check against the previous load.
            if state.as_ref() == Some(&keys) {
                debug!(table, "partition set unchanged, skipping materialization");
                continue;
            }

            let batch = self
                .loader
                .load(origin.as_ref(), &partitions)
                .await
                .map_err(Error::Core)?;
            info!(table, rows = batch.num_rows(), "materializing table");

            // Full replace: the new partition set supersedes the old table.
            self.ctx.deregister_table(table.as_str())?;
            self.ctx
                .register_table(table.as_str(), Arc::new(MaterializedTable::new(batch)))?;

            *state = Some(keys);
        }

        Ok(())
    }

    /// Execute a SQL query, materializing any required origins first.
    pub async fn query(&self, sql: &str) -> Result<Vec<RecordBatch>> {
        self.ensure_loaded(sql).await?;
        let df = self.ctx.sql(sql).await?;
        Ok(df.collect().await?)
    }

    /// The underlying session context, for advanced usage.
    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// The origin registry backing this feed.
    pub fn registry(&self) -> &OriginRegistry {
        &self.registry
    }

    /// The partition keys last materialized for a table, if any.
    pub async fn loaded_partitions(&self, table: &str) -> Option<HashSet<String>> {
        match self.loaded.get(table) {
            Some(slot) => slot.lock().await.clone(),
            None => None,
        }
    }
}

impl std::fmt::Debug for Feed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Feed")
            .field("registry", &self.registry)
            .field("cache_root", &self.loader.cache_root())
            .finish()
    }
}
