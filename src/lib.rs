//! # boxvtk
//!
//! Time-series access to box archives: tar files whose members are
//! zstd-compressed legacy VTK `STRUCTURED_POINTS` snapshots, one per
//! timestep and refinement level.
//!
//! The archive is indexed once per filename/level selection (each member's
//! header is read for its time and its geometry probed for the whole
//! extent). Snapshots are then decoded on demand by exact time.
//!
//! ## Modules
//!
//! - [`util`] - Errors, dimensions and extents
//! - [`archive`] - Box container and member table
//! - [`core`] - Header records, level selection, time index, decompression
//! - [`vtk`] - Legacy VTK structured-points decoding
//! - [`series`] - Indexing, loading, and the [`BoxReader`] query surface
//!
//! ## Example
//!
//! ```ignore
//! use boxvtk::BoxReader;
//!
//! let reader = BoxReader::open("run.box", "a")?;
//! if let Some((first, last)) = reader.time_range() {
//!     println!("t = {} .. {}", first, last);
//! }
//! let grid = reader.load_at(1.5)?;
//! println!("{} points", grid.num_points());
//! ```

pub mod util;
pub mod archive;
pub mod core;
pub mod vtk;
pub mod series;

// Re-export commonly used types
pub use util::{Dimensions, Error, Result, WholeExtent};
pub use archive::{ArchiveMember, BoxArchive};
pub use series::{BoxReader, ReaderConfig, ScanPolicy};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Dimensions, Error, Result, WholeExtent};
    pub use crate::archive::{ArchiveMember, BoxArchive};
    pub use crate::core::{HeaderRecord, LevelSelector, TimeIndex};
    pub use crate::series::{ArchiveIndexer, BoxReader, ReaderConfig, ScanPolicy, SeriesIndex, SnapshotLoader};
    pub use crate::vtk::{DatasetDecoder, LegacyDecoder, StructuredGrid};
}
