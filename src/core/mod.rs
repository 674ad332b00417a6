//! Core layer - the pieces a time-series build is assembled from.
//!
//! - [`HeaderRecord`] - Snapshot header line parsing
//! - [`LevelSelector`] / [`level_suffix`] - Member selection by refinement level
//! - [`TimeIndex`] - Time to member lookup in archive order
//! - Payload decompression ([`read_header_lines`], [`decompress`])

mod header;
mod level;
mod time_index;
mod compression;

pub use header::HeaderRecord;
pub use level::{level_suffix, LevelSelector};
pub use time_index::{TimeEntry, TimeIndex};
pub use compression::{decompress, open_stream, read_header_lines};
