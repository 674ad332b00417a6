//! One pass over an archive: select members, read their headers, probe
//! their dimensions.

use tracing::{debug, info, warn};

use crate::archive::{ArchiveMember, BoxArchive};
use crate::core::{decompress, read_header_lines, HeaderRecord, LevelSelector, TimeIndex};
use crate::util::{Error, Result, WholeExtent};
use crate::vtk::DatasetDecoder;

/// What to do with a member that cannot be indexed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScanPolicy {
    /// Log a warning, leave the member out and continue.
    #[default]
    Lenient,
    /// Abort the whole build with the member's error.
    Strict,
}

/// A member left out of (part of) the index.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedMember {
    pub name: String,
    pub reason: String,
}

/// Result of indexing one archive for one level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeriesIndex {
    pub times: TimeIndex,
    pub extent: WholeExtent,
    /// Members that failed name, header or dimension checks.
    pub skipped: Vec<SkippedMember>,
}

/// Builds a [`SeriesIndex`] from an open archive.
pub struct ArchiveIndexer<'a, D: DatasetDecoder + ?Sized> {
    decoder: &'a D,
    policy: ScanPolicy,
}

impl<'a, D: DatasetDecoder + ?Sized> ArchiveIndexer<'a, D> {
    pub fn new(decoder: &'a D, policy: ScanPolicy) -> Self {
        Self { decoder, policy }
    }

    /// Index every member of `archive` that belongs to `level`.
    ///
    /// Members are visited in archive-listing order and the time index keeps
    /// that order. A member whose header parses is indexed even if its
    /// dimensions cannot be probed; it then simply does not widen the extent.
    pub fn build(&self, archive: &BoxArchive, level: &LevelSelector) -> Result<SeriesIndex> {
        let mut index = SeriesIndex::default();

        for member in archive.members() {
            match level.matches(&member.name) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    self.skip(&mut index, member, e)?;
                    continue;
                }
            }

            let bytes = archive.member_bytes(member)?;

            let header = match read_header(&bytes) {
                Ok(header) => header,
                Err(e) => {
                    self.skip(&mut index, member, e)?;
                    continue;
                }
            };
            debug!(member = %member.name, time = header.time, variable = %header.variable_name, "indexed");
            index.times.push(header, member.clone());

            // The header stream is spent; decompress again from the start.
            match decompress(&bytes).and_then(|payload| self.decoder.probe_dimensions(&payload)) {
                Ok(dims) => index.extent.include(dims),
                Err(e) => self.skip(&mut index, member, e)?,
            }
        }

        info!(
            archive = %archive.path().display(),
            level = %level,
            snapshots = index.times.len(),
            skipped = index.skipped.len(),
            extent = %index.extent.dimensions(),
            "built time index"
        );
        Ok(index)
    }

    fn skip(&self, index: &mut SeriesIndex, member: &ArchiveMember, error: Error) -> Result<()> {
        if self.policy == ScanPolicy::Strict || !error.is_member_local() {
            return Err(error);
        }
        warn!(member = %member.name, error = %error, "skipping member");
        index.skipped.push(SkippedMember {
            name: member.name.clone(),
            reason: error.to_string(),
        });
        Ok(())
    }
}

/// Header record from the second text line of a compressed payload.
pub fn read_header(compressed: &[u8]) -> Result<HeaderRecord> {
    let lines = read_header_lines(compressed, 2)?;
    let line = lines
        .get(1)
        .ok_or_else(|| Error::malformed("", "payload ends before the header line"))?;
    HeaderRecord::parse(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_header_skips_marker_line() {
        let payload = b"# vtk DataFile Version 3.0\nvariable ham, level 5, time  1.012500000e+01\nBINARY\n";
        let compressed = zstd::encode_all(&payload[..], 3).unwrap();
        let header = read_header(&compressed).unwrap();
        assert_eq!(header.variable_name, "ham");
        assert_eq!(header.level_tag, "5");
        assert_eq!(header.time, 10.125);
    }

    #[test]
    fn test_read_header_single_line() {
        let compressed = zstd::encode_all(&b"# vtk DataFile Version 3.0\n"[..], 3).unwrap();
        assert!(matches!(read_header(&compressed), Err(Error::MalformedHeader { .. })));
    }
}
