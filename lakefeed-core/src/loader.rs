//! The per-origin fetch/parse/cache load pipeline.
//!
//! For each requested partition the pipeline computes the cache key
//! `{origin.key}:{partition.key}`, delegates to the cache store with a
//! fetch-then-parse loader closure, conforms the resulting batch to the
//! origin's declared schema, and finally concatenates all partitions
//! row-wise in their declared iteration order.
//!
//! Conformance happens after the cache returns (hit or computed): the cached
//! artifact stores the raw parse result, and declared-type casting is applied
//! on every load so schema drift in a provider surfaces immediately.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, RecordBatch};
use arrow::compute::{cast, concat_batches};
use arrow::datatypes::{Field, Schema};
use tracing::{debug, info};

use crate::cache;
use crate::error::{Error, Result};
use crate::origin::Origin;
use crate::partition::Partition;
use crate::schema::TableSchema;

/// Loads origin partitions through the on-disk cache.
///
/// Stateless apart from the cache root; distinct (origin, partition) pairs
/// write distinct files, so concurrent loads never conflict.
#[derive(Debug, Clone)]
pub struct OriginLoader {
    cache_root: PathBuf,
}

impl OriginLoader {
    /// Create a loader rooted at the given cache directory.
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
        }
    }

    /// Create a loader rooted at [`cache::default_cache_dir`].
    pub fn with_default_root() -> Result<Self> {
        let root = cache::default_cache_dir().ok_or_else(|| {
            Error::CacheIo(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no per-user cache directory available",
            ))
        })?;
        Ok(Self::new(root))
    }

    /// The cache root directory.
    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Load the given partitions of an origin and concatenate them.
    ///
    /// Each partition is fetched/parsed/cached independently; rows appear in
    /// per-partition order, partitions in the order given. No deduplication
    /// across partitions is performed.
    pub async fn load(&self, origin: &dyn Origin, partitions: &[Partition]) -> Result<RecordBatch> {
        info!(
            origin = origin.key(),
            partitions = partitions.len(),
            "loading origin"
        );
        let cachedir = self.cache_root.join(origin.key());

        let mut conformed = Vec::with_capacity(partitions.len());
        for partition in partitions {
            let key = format!("{}:{}", origin.key(), partition.key());
            debug!(%key, "loading partition");
            let raw = cache::record_batch(
                &key,
                || async {
                    let payload = origin.fetch(partition).await?;
                    origin.parse(partition, payload)
                },
                &cachedir,
            )
            .await?;
            conformed.push(conform_batch(origin.key(), origin.schema(), raw)?);
        }

        match conformed.first() {
            None => Ok(RecordBatch::new_empty(origin.schema().to_arrow())),
            Some(first) => {
                let schema = first.schema();
                Ok(concat_batches(&schema, &conformed)?)
            }
        }
    }
}

/// Conform a parsed batch to the origin's declared schema.
///
/// The batch's column set must be a subset of the declared columns; anything
/// outside it is fatal. Present columns are cast to their declared native
/// types and reordered into declared-schema order.
pub fn conform_batch(
    origin_key: &str,
    schema: &TableSchema,
    batch: RecordBatch,
) -> Result<RecordBatch> {
    let declared: HashSet<&str> = schema.column_names();
    let mut unexpected: Vec<String> = batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().to_string())
        .filter(|name| !declared.contains(name.as_str()))
        .collect();
    if !unexpected.is_empty() {
        unexpected.sort();
        return Err(Error::SchemaMismatch {
            origin: origin_key.to_string(),
            columns: unexpected,
        });
    }

    let mut fields: Vec<Field> = Vec::new();
    let mut arrays: Vec<ArrayRef> = Vec::new();
    for column in schema.columns() {
        let Ok(index) = batch.schema().index_of(&column.name) else {
            continue;
        };
        let target = column.kind.arrow_type();
        let array = cast(batch.column(index), &target).map_err(|e| Error::Cast {
            origin: origin_key.to_string(),
            column: column.name.clone(),
            target: column.kind.to_string(),
            reason: e.to_string(),
        })?;
        fields.push(column.to_arrow());
        arrays.push(array);
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::DataType;
    use async_trait::async_trait;
    use bytes::Bytes;
    use tempfile::tempdir;

    use crate::origin::{Payload, Predicate};
    use crate::parser::{parse_csv, CsvOptions};
    use crate::schema::{ColumnDescriptor, ColumnKind};

    use super::*;

    /// Test origin serving fixed CSV text per partition, counting fetches.
    struct TextOrigin {
        schema: TableSchema,
        parts: Vec<(Partition, &'static [u8])>,
        fetches: AtomicUsize,
    }

    impl TextOrigin {
        fn new(parts: Vec<(Partition, &'static [u8])>) -> Self {
            let schema = TableSchema::new(
                "measurements",
                vec![
                    ColumnDescriptor::new("id", ColumnKind::Integer),
                    ColumnDescriptor::new("value", ColumnKind::Float),
                ],
            )
            .unwrap();
            Self {
                schema,
                parts,
                fetches: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Origin for TextOrigin {
        fn schema(&self) -> &TableSchema {
            &self.schema
        }

        fn partitions(
            &self,
            _columns: &HashSet<String>,
            _predicate: Option<&Predicate>,
        ) -> Result<Vec<Partition>> {
            Ok(self.parts.iter().map(|(p, _)| p.clone()).collect())
        }

        async fn fetch(&self, partition: &Partition) -> Result<Payload> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let (_, text) = self
                .parts
                .iter()
                .find(|(p, _)| p == partition)
                .expect("unknown partition");
            Ok(Payload::Bytes(Bytes::from_static(text)))
        }

        fn parse(&self, _partition: &Partition, payload: Payload) -> Result<RecordBatch> {
            match payload {
                Payload::Bytes(bytes) => parse_csv(&bytes, &CsvOptions::default()),
                Payload::Batch(batch) => Ok(batch),
            }
        }
    }

    fn partition(key: &str) -> Partition {
        Partition::new(key, ["id", "value"]).unwrap()
    }

    #[tokio::test]
    async fn test_load_casts_to_declared_types() {
        let dir = tempdir().unwrap();
        let origin = TextOrigin::new(vec![(partition("full"), b"id,value\n1,2\n2,4\n")]);
        let loader = OriginLoader::new(dir.path());

        let batch = loader
            .load(&origin, &[partition("full")])
            .await
            .unwrap();
        assert_eq!(batch.num_rows(), 2);
        // "value" is inferred as Int64 from the payload but declared Float.
        assert_eq!(batch.schema().field(1).data_type(), &DataType::Float64);
        let values = batch
            .column(1)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(values.value(1), 4.0);
    }

    #[tokio::test]
    async fn test_second_load_hits_cache() {
        let dir = tempdir().unwrap();
        let origin = TextOrigin::new(vec![(partition("full"), b"id,value\n1,1.5\n")]);
        let loader = OriginLoader::new(dir.path());

        let first = loader.load(&origin, &[partition("full")]).await.unwrap();
        let second = loader.load(&origin, &[partition("full")]).await.unwrap();
        assert_eq!(origin.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
        assert!(dir
            .path()
            .join("measurements")
            .join("measurements:full.parquet")
            .exists());
    }

    #[tokio::test]
    async fn test_concatenation_order() {
        let dir = tempdir().unwrap();
        let p1 = partition("shard_a");
        let p2 = partition("shard_b");
        let origin = TextOrigin::new(vec![
            (p1.clone(), b"id,value\n1,1.0\n2,2.0\n"),
            (p2.clone(), b"id,value\n3,3.0\n"),
        ]);
        let loader = OriginLoader::new(dir.path());

        let batch = loader.load(&origin, &[p1, p2]).await.unwrap();
        assert_eq!(batch.num_rows(), 3);
        let ids = batch
            .column(0)
            .as_any()
            .downcast_ref::<Int64Array>()
            .unwrap();
        assert_eq!(&ids.values()[..], &[1, 2, 3]);
    }

    #[tokio::test]
    async fn test_unexpected_column_is_fatal() {
        let dir = tempdir().unwrap();
        // Payload carries a column the schema never declared.
        let origin = TextOrigin::new(vec![(partition("full"), b"id,value,extra\n1,1.0,x\n")]);
        let loader = OriginLoader::new(dir.path());

        let err = loader
            .load(&origin, &[partition("full")])
            .await
            .unwrap_err();
        match err {
            Error::SchemaMismatch { origin, columns } => {
                assert_eq!(origin, "measurements");
                assert_eq!(columns, vec!["extra".to_string()]);
            }
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_conform_reorders_and_subsets() {
        let schema = TableSchema::new(
            "t",
            vec![
                ColumnDescriptor::new("a", ColumnKind::Integer),
                ColumnDescriptor::new("b", ColumnKind::String),
                ColumnDescriptor::new("c", ColumnKind::Float),
            ],
        )
        .unwrap();

        // Payload has b then a, and no c at all.
        let payload_schema = Arc::new(Schema::new(vec![
            Field::new("b", DataType::Utf8, false),
            Field::new("a", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            payload_schema,
            vec![
                Arc::new(StringArray::from(vec!["x", "y"])) as ArrayRef,
                Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef,
            ],
        )
        .unwrap();

        let conformed = conform_batch("t", &schema, batch).unwrap();
        assert_eq!(conformed.num_columns(), 2);
        assert_eq!(conformed.schema().field(0).name(), "a");
        assert_eq!(conformed.schema().field(1).name(), "b");
    }
}
