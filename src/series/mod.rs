//! Time-series layer: indexing an archive and loading snapshots by time.
//!
//! - [`ArchiveIndexer`] - One pass over the members of a level
//! - [`SnapshotLoader`] - Exact-time snapshot decoding
//! - [`BoxReader`] - Settings, last-good index and query surface

mod indexer;
mod loader;
mod reader;

pub use indexer::{read_header, ArchiveIndexer, ScanPolicy, SeriesIndex, SkippedMember};
pub use loader::SnapshotLoader;
pub use reader::{BoxReader, ReaderConfig};
