//! Content-addressed on-disk cache for parsed partitions.
//!
//! The cache maps a string key to a parquet-serialized record batch. Entries
//! are immutable once written: a key always maps to the same logical content,
//! so hits never need a freshness check beyond file existence. Nothing is
//! ever evicted here; stale entries persist until cleared manually.
//!
//! Two key derivation variants are supported:
//!
//! - the raw key used verbatim as a file name (keys built from validated
//!   origin/partition identifiers), or
//! - [`digest`], a SHA-256 hex digest for free-form keys that may contain
//!   characters unsafe for file names or must stay fixed-length.

use std::fs::File;
use std::future::Future;
use std::path::{Path, PathBuf};

use arrow::array::RecordBatch;
use arrow::compute::concat_batches;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use tracing::debug;

use crate::error::Result;

/// Environment variable overriding the default cache root.
pub const CACHE_DIR_ENV: &str = "LAKEFEED_CACHE_DIR";

/// Default cache root directory.
///
/// `LAKEFEED_CACHE_DIR` if set, otherwise `lakefeed` under the per-user
/// cache directory. `None` when the platform reports no cache directory.
pub fn default_cache_dir() -> Option<PathBuf> {
    std::env::var_os(CACHE_DIR_ENV)
        .map(PathBuf::from)
        .or_else(|| dirs::cache_dir().map(|dir| dir.join("lakefeed")))
}

/// SHA-256 hex digest of a free-form cache key.
pub fn digest(key: &str) -> String {
    let hash = ring::digest::digest(&ring::digest::SHA256, key.as_bytes());
    hash.as_ref().iter().map(|b| format!("{b:02x}")).collect()
}

/// Return the record batch for the given key - either from cache or via the
/// loader followed by caching the result.
///
/// The loader runs only on a miss, and its errors propagate uncaught; there
/// is no retry at this layer. On a miss the cache directory is created if
/// needed (tolerating prior existence) and the batch is persisted before
/// being returned.
pub async fn record_batch<F, Fut>(key: &str, loader: F, cachedir: &Path) -> Result<RecordBatch>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<RecordBatch>>,
{
    let stored = cachedir.join(format!("{key}.parquet"));
    if stored.exists() {
        debug!(key, "cache hit");
        return read_parquet(&stored);
    }
    debug!(key, "cache miss");
    let batch = loader().await?;
    std::fs::create_dir_all(cachedir)?;
    write_parquet(&stored, &batch)?;
    Ok(batch)
}

fn read_parquet(path: &Path) -> Result<RecordBatch> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    if batches.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }
    Ok(concat_batches(&schema, &batches)?)
}

fn write_parquet(path: &Path, batch: &RecordBatch) -> Result<()> {
    // Write to a process-unique sibling, then rename: readers only ever see
    // complete files, and concurrent writers of the same key stay safe
    // (last rename wins, entries are idempotent per key).
    let tmp = path.with_extension(format!("parquet.{}", std::process::id()));
    let file = File::create(&tmp)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(batch)?;
    writer.close()?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
