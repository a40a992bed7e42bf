//! Partition identity model.
//!
//! A partition identifies an independently retrievable slice of an origin's
//! data (typically one remote file). Identity is carried entirely by the
//! `key` string: two partitions with equal keys are the same partition, so
//! the key must be deterministic and unique within its origin.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};
use crate::schema::is_identifier;

/// Key of the implicit whole-dataset partition.
pub const FULL_PARTITION_KEY: &str = "full";

/// An identifiable, independently retrievable slice of an origin's data.
///
/// Immutable after construction. Equality and hashing consider only the key,
/// which is also used in cache file names, so it is restricted to the
/// identifier alphabet.
#[derive(Debug, Clone)]
pub struct Partition {
    key: String,
    columns: HashSet<String>,
}

impl Partition {
    /// Create a partition with the given key and declared column set.
    pub fn new<I, S>(key: impl Into<String>, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key = key.into();
        if !is_identifier(&key) {
            return Err(Error::InvalidIdentifier { name: key });
        }
        Ok(Self {
            key,
            columns: columns.into_iter().map(Into::into).collect(),
        })
    }

    /// The implicit partition for origins with no sub-partitioning.
    pub fn full<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: FULL_PARTITION_KEY.to_string(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Stable partition identifier.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Columns this partition contains.
    pub fn columns(&self) -> &HashSet<String> {
        &self.columns
    }

    /// Whether this partition's columns are a superset of the request.
    pub fn covers<'a, I>(&self, requested: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        requested.into_iter().all(|c| self.columns.contains(c))
    }
}

impl PartialEq for Partition {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Partition {}

impl Hash for Partition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// First declared partition whose columns cover the request, if any.
///
/// This is the selection policy for origins with multiple fixed partitions
/// (e.g. a train/test split): declaration order is the priority order.
pub fn first_covering<'a>(
    partitions: &'a [Partition],
    requested: &HashSet<String>,
) -> Option<&'a Partition> {
    partitions
        .iter()
        .find(|p| p.covers(requested.iter().map(String::as_str)))
}
