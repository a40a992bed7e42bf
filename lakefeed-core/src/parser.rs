//! Reusable delimited-text parsing.
//!
//! Origins whose payload is byte-oriented tabular text (the common case for
//! remote file downloads) share this decoder instead of each implementing
//! their own. The payload is decoded with an inferred schema; conforming the
//! result to the origin's declared types happens later in the load pipeline.

use std::io::Cursor;
use std::sync::Arc;

use arrow::array::RecordBatch;
use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use bytes::Bytes;

use crate::error::Result;

/// Decoding options for delimited-text payloads.
///
/// Per-origin knobs for payloads that deviate from plain comma-separated
/// text with a header row.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Whether the first row is a header.
    pub has_header: bool,
    /// Rows to examine for schema inference; `None` scans the whole payload.
    pub infer_records: Option<usize>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            infer_records: Some(1000),
        }
    }
}

/// Number of rows per decoded batch before concatenation.
const BATCH_SIZE: usize = 8192;

/// Decode a delimited-text payload into a single record batch.
///
/// Column types are inferred from the payload itself; the caller casts them
/// to the declared schema afterwards.
pub fn parse_csv(payload: &Bytes, options: &CsvOptions) -> Result<RecordBatch> {
    let format = Format::default()
        .with_header(options.has_header)
        .with_delimiter(options.delimiter);

    let (schema, _) = format.infer_schema(Cursor::new(payload.as_ref()), options.infer_records)?;
    let schema = Arc::new(schema);

    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .with_batch_size(BATCH_SIZE)
        .build(Cursor::new(payload.as_ref()))?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    if batches.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }
    Ok(concat_batches(&schema, &batches)?)
}
