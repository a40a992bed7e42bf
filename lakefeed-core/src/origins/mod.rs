//! Concrete origin implementations.
//!
//! These cover the two payload shapes the pipeline supports out of the box:
//! bundled in-process datasets ([`BundledCsvOrigin`]) and delimited-text
//! files behind an object store ([`CsvFileOrigin`]). Providers with other
//! transports implement [`crate::Origin`] directly.

mod bundled;
mod files;

pub use bundled::{iris, BundledCsvOrigin};
pub use files::{CsvFileOrigin, FilePartition};
