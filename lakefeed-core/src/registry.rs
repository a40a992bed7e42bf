//! Origin registry.
//!
//! Maps table names to the origins able to serve them. Origins that fail to
//! initialize (missing credentials, unavailable backend) are excluded at
//! registration time with a diagnostic, rather than failing later on first
//! use.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::error::{Error, Result};
use crate::origin::Origin;

/// Registry of available origins, keyed by table name.
#[derive(Default, Clone)]
pub struct OriginRegistry {
    origins: HashMap<String, Arc<dyn Origin>>,
}

impl OriginRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an origin under its table name.
    ///
    /// Fails if another origin already claims the same table.
    pub fn register(&mut self, origin: Arc<dyn Origin>) -> Result<()> {
        let table = origin.key().to_string();
        if self.origins.contains_key(&table) {
            return Err(Error::DuplicateOrigin { table });
        }
        self.origins.insert(table, origin);
        Ok(())
    }

    /// Register an origin that may have failed to initialize.
    ///
    /// On error the origin is excluded from the registry and a warning is
    /// emitted; queries referencing its table will fail with
    /// [`Error::UnresolvableOrigin`].
    pub fn register_available(&mut self, origin: Result<Arc<dyn Origin>>) -> Result<()> {
        match origin {
            Ok(origin) => self.register(origin),
            Err(error) => {
                warn!(%error, "origin unavailable, excluding from registry");
                Ok(())
            }
        }
    }

    /// Look up the origin serving a table.
    pub fn get(&self, table: &str) -> Option<Arc<dyn Origin>> {
        self.origins.get(table).cloned()
    }

    /// Whether a table has a registered origin.
    pub fn contains(&self, table: &str) -> bool {
        self.origins.contains_key(table)
    }

    /// Iterate over registered origins.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Origin>)> {
        self.origins.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of registered origins.
    pub fn len(&self) -> usize {
        self.origins.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}

impl std::fmt::Debug for OriginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OriginRegistry")
            .field("tables", &self.origins.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use arrow::array::RecordBatch;
    use async_trait::async_trait;

    use crate::origin::{Payload, Predicate};
    use crate::partition::Partition;
    use crate::schema::{ColumnDescriptor, ColumnKind, TableSchema};

    use super::*;

    struct StubOrigin {
        schema: TableSchema,
    }

    impl StubOrigin {
        fn new(name: &str) -> Arc<dyn Origin> {
            let schema = TableSchema::new(
                name,
                vec![ColumnDescriptor::new("id", ColumnKind::Integer)],
            )
            .unwrap();
            Arc::new(Self { schema })
        }
    }

    #[async_trait]
    impl Origin for StubOrigin {
        fn schema(&self) -> &TableSchema {
            &self.schema
        }

        fn partitions(
            &self,
            _columns: &HashSet<String>,
            _predicate: Option<&Predicate>,
        ) -> Result<Vec<Partition>> {
            Ok(vec![Partition::full(["id"])])
        }

        async fn fetch(&self, _partition: &Partition) -> Result<Payload> {
            Ok(Payload::Batch(RecordBatch::new_empty(
                self.schema.to_arrow(),
            )))
        }

        fn parse(&self, _partition: &Partition, payload: Payload) -> Result<RecordBatch> {
            match payload {
                Payload::Batch(batch) => Ok(batch),
                Payload::Bytes(_) => unreachable!(),
            }
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = OriginRegistry::new();
        registry.register(StubOrigin::new("iris")).unwrap();

        assert!(registry.contains("iris"));
        assert!(registry.get("iris").is_some());
        assert!(registry.get("titanic").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = OriginRegistry::new();
        registry.register(StubOrigin::new("iris")).unwrap();
        let err = registry.register(StubOrigin::new("iris")).unwrap_err();
        assert!(matches!(err, Error::DuplicateOrigin { .. }));
    }

    #[test]
    fn test_unavailable_origin_excluded() {
        let mut registry = OriginRegistry::new();
        registry
            .register_available(Err(Error::UnresolvableOrigin {
                table: "kaggle_avazu".to_string(),
            }))
            .unwrap();
        assert!(registry.is_empty());

        registry
            .register_available(Ok(StubOrigin::new("iris")))
            .unwrap();
        assert_eq!(registry.len(), 1);
    }
}
