//! Origin over delimited-text files in an object store.
//!
//! Covers the common remote layout where a dataset ships as a handful of
//! fixed files with differing column sets (e.g. a train/test split whose
//! test file lacks the target column). Each file is one declared partition;
//! declaration order is the selection priority.

use std::collections::HashSet;
use std::sync::Arc;

use arrow::array::RecordBatch;
use async_trait::async_trait;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use tracing::debug;

use crate::error::{Error, FetchError, Result};
use crate::origin::{Origin, Payload, Predicate};
use crate::parser::{parse_csv, CsvOptions};
use crate::partition::{first_covering, Partition};
use crate::schema::TableSchema;

/// A declared partition together with its object-store location.
#[derive(Debug, Clone)]
pub struct FilePartition {
    partition: Partition,
    location: ObjectPath,
}

impl FilePartition {
    /// Bind a partition to the object path holding its payload.
    pub fn new(partition: Partition, location: impl Into<ObjectPath>) -> Self {
        Self {
            partition,
            location: location.into(),
        }
    }

    /// The partition identity.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// The object-store location of the payload.
    pub fn location(&self) -> &ObjectPath {
        &self.location
    }
}

/// An origin whose partitions are delimited-text files in an object store.
///
/// Works against any [`ObjectStore`] implementation: local filesystem,
/// in-memory (tests), S3, GCS. Transport specifics stay inside the store.
pub struct CsvFileOrigin {
    schema: TableSchema,
    store: Arc<dyn ObjectStore>,
    files: Vec<FilePartition>,
    options: CsvOptions,
}

impl CsvFileOrigin {
    /// Create an origin over the given store and declared file partitions.
    pub fn new(schema: TableSchema, store: Arc<dyn ObjectStore>, files: Vec<FilePartition>) -> Self {
        Self {
            schema,
            store,
            files,
            options: CsvOptions::default(),
        }
    }

    /// Override the CSV decoding options (delimiter, header handling).
    pub fn with_options(mut self, options: CsvOptions) -> Self {
        self.options = options;
        self
    }

    fn location_of(&self, partition: &Partition) -> Option<&ObjectPath> {
        self.files
            .iter()
            .find(|f| f.partition() == partition)
            .map(FilePartition::location)
    }
}

#[async_trait]
impl Origin for CsvFileOrigin {
    fn schema(&self) -> &TableSchema {
        &self.schema
    }

    fn partitions(
        &self,
        columns: &HashSet<String>,
        _predicate: Option<&Predicate>,
    ) -> Result<Vec<Partition>> {
        let declared: Vec<Partition> = self
            .files
            .iter()
            .map(|f| f.partition().clone())
            .collect();
        match first_covering(&declared, columns) {
            Some(partition) => Ok(vec![partition.clone()]),
            None => {
                let mut columns: Vec<String> = columns.iter().cloned().collect();
                columns.sort();
                Err(Error::NoSatisfyingPartition {
                    origin: self.key().to_string(),
                    columns,
                })
            }
        }
    }

    async fn fetch(&self, partition: &Partition) -> Result<Payload> {
        let location = self.location_of(partition).ok_or_else(|| {
            Error::Fetch(FetchError::Other {
                origin: self.key().to_string(),
                partition: partition.key().to_string(),
                reason: "partition not declared for this origin".to_string(),
            })
        })?;
        debug!(origin = self.key(), %location, "fetching partition payload");
        let result = self.store.get(location).await.map_err(|source| {
            FetchError::ObjectStore {
                origin: self.key().to_string(),
                partition: partition.key().to_string(),
                source,
            }
        })?;
        let bytes = result.bytes().await.map_err(|source| {
            FetchError::ObjectStore {
                origin: self.key().to_string(),
                partition: partition.key().to_string(),
                source,
            }
        })?;
        Ok(Payload::Bytes(bytes))
    }

    fn parse(&self, _partition: &Partition, payload: Payload) -> Result<RecordBatch> {
        match payload {
            Payload::Bytes(bytes) => parse_csv(&bytes, &self.options),
            Payload::Batch(batch) => Ok(batch),
        }
    }
}

#[cfg(test)]
mod tests {
    use object_store::memory::InMemory;
    use object_store::PutPayload;

    use crate::schema::{ColumnDescriptor, ColumnKind};

    use super::*;

    async fn split_origin() -> CsvFileOrigin {
        let store = Arc::new(InMemory::new());
        store
            .put(
                &ObjectPath::from("titanic/train.csv"),
                PutPayload::from_static(b"id,age,survived\n1,22,0\n2,38,1\n"),
            )
            .await
            .unwrap();
        store
            .put(
                &ObjectPath::from("titanic/test.csv"),
                PutPayload::from_static(b"id,age\n3,26\n"),
            )
            .await
            .unwrap();

        let schema = TableSchema::new(
            "titanic",
            vec![
                ColumnDescriptor::new("id", ColumnKind::Integer),
                ColumnDescriptor::new("age", ColumnKind::Float),
                ColumnDescriptor::new("survived", ColumnKind::Integer),
            ],
        )
        .unwrap();

        // Testset first: preferred whenever it covers the request.
        CsvFileOrigin::new(
            schema,
            store,
            vec![
                FilePartition::new(
                    Partition::new("test", ["id", "age"]).unwrap(),
                    "titanic/test.csv",
                ),
                FilePartition::new(
                    Partition::new("train", ["id", "age", "survived"]).unwrap(),
                    "titanic/train.csv",
                ),
            ],
        )
    }

    #[tokio::test]
    async fn test_first_superset_selection() {
        let origin = split_origin().await;

        let requested: HashSet<String> = ["id".to_string(), "age".to_string()].into();
        let partitions = origin.partitions(&requested, None).unwrap();
        assert_eq!(partitions.len(), 1);
        assert_eq!(partitions[0].key(), "test");

        let requested: HashSet<String> = ["survived".to_string()].into();
        let partitions = origin.partitions(&requested, None).unwrap();
        assert_eq!(partitions[0].key(), "train");
    }

    #[tokio::test]
    async fn test_no_satisfying_partition() {
        let origin = split_origin().await;
        let requested: HashSet<String> = ["fare".to_string()].into();
        let err = origin.partitions(&requested, None).unwrap_err();
        match err {
            Error::NoSatisfyingPartition { origin, columns } => {
                assert_eq!(origin, "titanic");
                assert_eq!(columns, vec!["fare".to_string()]);
            }
            other => panic!("expected NoSatisfyingPartition, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_and_parse() {
        let origin = split_origin().await;
        let partition = Partition::new("train", ["id", "age", "survived"]).unwrap();

        let payload = origin.fetch(&partition).await.unwrap();
        let batch = origin.parse(&partition, payload).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 3);
    }

    #[tokio::test]
    async fn test_fetch_missing_object_is_fetch_error() {
        let store = Arc::new(InMemory::new());
        let schema = TableSchema::new(
            "empty",
            vec![ColumnDescriptor::new("id", ColumnKind::Integer)],
        )
        .unwrap();
        let origin = CsvFileOrigin::new(
            schema,
            store,
            vec![FilePartition::new(
                Partition::new("full", ["id"]).unwrap(),
                "missing.csv",
            )],
        );

        let partition = Partition::new("full", ["id"]).unwrap();
        let err = origin.fetch(&partition).await.unwrap_err();
        assert!(matches!(err, Error::Fetch(FetchError::ObjectStore { .. })));
    }
}
