//! Time-series reader over a box archive.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::indexer::{ArchiveIndexer, ScanPolicy, SeriesIndex};
use super::loader::SnapshotLoader;
use crate::archive::BoxArchive;
use crate::core::LevelSelector;
use crate::util::{Result, WholeExtent};
use crate::vtk::{DatasetDecoder, LegacyDecoder, StructuredGrid};

/// Reader settings. Changing the filename or level invalidates the index.
#[derive(Clone, Debug, PartialEq)]
pub struct ReaderConfig {
    pub filename: Option<PathBuf>,
    /// Refinement level to read; empty selects unleveled members.
    pub level_suffix: LevelSelector,
    pub policy: ScanPolicy,
    /// Memory-map the archive instead of reading through a file handle.
    pub use_mmap: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            filename: None,
            level_suffix: LevelSelector::default(),
            policy: ScanPolicy::default(),
            use_mmap: cfg!(feature = "mmap"),
        }
    }
}

impl ReaderConfig {
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: Some(filename.into()),
            ..Self::default()
        }
    }

    pub fn level(mut self, level: impl Into<LevelSelector>) -> Self {
        self.level_suffix = level.into();
        self
    }

    pub fn policy(mut self, policy: ScanPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn use_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }
}

/// An open archive together with the index built from it.
struct Series {
    archive: BoxArchive,
    index: SeriesIndex,
}

/// Serves snapshots of one archive level by time.
///
/// The index is rebuilt by [`update_information`](Self::update_information)
/// after the filename or level changes. Until a rebuild succeeds the last
/// good archive and index stay in service.
pub struct BoxReader<D: DatasetDecoder = LegacyDecoder> {
    config: ReaderConfig,
    decoder: D,
    series: Option<Series>,
    stale: bool,
}

impl BoxReader<LegacyDecoder> {
    pub fn new(config: ReaderConfig) -> Self {
        Self::with_decoder(config, LegacyDecoder::new())
    }

    /// Open `path`, select `level` and build the index.
    pub fn open(path: impl AsRef<Path>, level: impl Into<LevelSelector>) -> Result<Self> {
        let mut reader = Self::new(ReaderConfig::new(path.as_ref()).level(level));
        reader.update_information()?;
        Ok(reader)
    }
}

impl<D: DatasetDecoder> BoxReader<D> {
    pub fn with_decoder(config: ReaderConfig, decoder: D) -> Self {
        Self {
            config,
            decoder,
            series: None,
            stale: true,
        }
    }

    #[inline]
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    #[inline]
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn set_filename(&mut self, filename: impl Into<PathBuf>) {
        let filename = Some(filename.into());
        if self.config.filename != filename {
            self.config.filename = filename;
            self.stale = true;
        }
    }

    pub fn set_level_suffix(&mut self, level: impl Into<LevelSelector>) {
        let level = level.into();
        if self.config.level_suffix != level {
            self.config.level_suffix = level;
            self.stale = true;
        }
    }

    pub fn set_policy(&mut self, policy: ScanPolicy) {
        if self.config.policy != policy {
            self.config.policy = policy;
            self.stale = true;
        }
    }

    /// Takes effect at the next rebuild.
    pub fn set_use_mmap(&mut self, use_mmap: bool) {
        self.config.use_mmap = use_mmap;
    }

    /// Whether the settings changed since the last successful build.
    #[inline]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Rebuild the index if the settings changed.
    ///
    /// On failure the previous archive and index are kept and the reader
    /// stays stale. Without a filename this is a no-op.
    pub fn update_information(&mut self) -> Result<()> {
        if !self.stale {
            return Ok(());
        }
        let Some(path) = self.config.filename.as_deref() else {
            debug!("no filename set, nothing to index");
            return Ok(());
        };

        let archive = BoxArchive::open_opts(path, self.config.use_mmap)?;
        let index = ArchiveIndexer::new(&self.decoder, self.config.policy)
            .build(&archive, &self.config.level_suffix)?;

        // Replacing the series drops (and closes) the previous archive.
        self.series = Some(Series { archive, index });
        self.stale = false;
        Ok(())
    }

    /// Index in service, if any build has succeeded.
    pub fn index(&self) -> Option<&SeriesIndex> {
        self.series.as_ref().map(|s| &s.index)
    }

    /// Archive in service, if any build has succeeded.
    pub fn archive(&self) -> Option<&BoxArchive> {
        self.series.as_ref().map(|s| &s.archive)
    }

    /// Timestep markers in archive-listing order.
    pub fn available_times(&self) -> Vec<f64> {
        self.index().map(|i| i.times.times()).unwrap_or_default()
    }

    /// First and last timestep by listing order.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        self.index()?.times.time_range()
    }

    pub fn whole_extent(&self) -> WholeExtent {
        self.index().map(|i| i.extent).unwrap_or_default()
    }

    /// Snapshot at exactly `time`; `None` when nothing matches.
    pub fn try_load_at(&self, time: f64) -> Result<Option<StructuredGrid>> {
        let Some(series) = &self.series else {
            return Ok(None);
        };
        SnapshotLoader::new(&series.archive, &self.decoder).try_load(&series.index.times, time)
    }

    /// Snapshot at exactly `time`; the empty grid when nothing matches.
    pub fn load_at(&self, time: f64) -> Result<StructuredGrid> {
        Ok(self.try_load_at(time)?.unwrap_or_default())
    }

    /// Drop the archive and index; the next update rebuilds from scratch.
    pub fn close(&mut self) {
        if let Some(series) = self.series.take() {
            series.archive.close();
        }
        self.stale = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_mark_stale_only_on_change() {
        let mut reader = BoxReader::new(ReaderConfig::default());
        reader.stale = false;

        reader.set_level_suffix("");
        assert!(!reader.is_stale());
        reader.set_level_suffix("a");
        assert!(reader.is_stale());

        reader.stale = false;
        reader.set_filename("run.box");
        assert!(reader.is_stale());
        reader.stale = false;
        reader.set_filename("run.box");
        assert!(!reader.is_stale());
    }

    #[test]
    fn test_queries_before_indexing() {
        let mut reader = BoxReader::new(ReaderConfig::default());
        reader.update_information().unwrap();
        assert!(reader.available_times().is_empty());
        assert_eq!(reader.time_range(), None);
        assert_eq!(reader.whole_extent().bounds(), [0; 6]);
        assert!(reader.load_at(1.0).unwrap().is_empty());
        assert!(reader.try_load_at(1.0).unwrap().is_none());
    }
}
