//! Snapshot loading by exact time match.

use tracing::debug;

use crate::archive::BoxArchive;
use crate::core::{decompress, TimeIndex};
use crate::util::Result;
use crate::vtk::{DatasetDecoder, StructuredGrid};

/// Decodes the snapshot recorded for a given time.
pub struct SnapshotLoader<'a, D: DatasetDecoder + ?Sized> {
    archive: &'a BoxArchive,
    decoder: &'a D,
}

impl<'a, D: DatasetDecoder + ?Sized> SnapshotLoader<'a, D> {
    /// `archive` must be the archive `index` was built from.
    pub fn new(archive: &'a BoxArchive, decoder: &'a D) -> Self {
        Self { archive, decoder }
    }

    /// Decode the snapshot whose time equals `time` exactly.
    ///
    /// Returns `Ok(None)` when nothing matches. A matched member that fails
    /// to decompress or decode is an error, never `None`.
    pub fn try_load(&self, index: &TimeIndex, time: f64) -> Result<Option<StructuredGrid>> {
        let Some(entry) = index.find(time) else {
            debug!(time, "no snapshot at requested time");
            return Ok(None);
        };
        debug!(time, member = %entry.member.name, "loading snapshot");

        let bytes = self.archive.member_bytes(&entry.member)?;
        let payload = decompress(&bytes)?;
        self.decoder.decode(&payload).map(Some)
    }

    /// Like [`try_load`](Self::try_load), with the empty grid standing in
    /// for an unmatched time.
    pub fn load(&self, index: &TimeIndex, time: f64) -> Result<StructuredGrid> {
        Ok(self.try_load(index, time)?.unwrap_or_default())
    }
}
