//! Legacy VTK dataset decoding.
//!
//! Snapshots are stored in the legacy "DataFile" serialization. The series
//! layer only talks to a [`DatasetDecoder`]: one call to probe a payload's
//! dimensions cheaply, one to decode it fully. [`LegacyDecoder`] is the
//! implementation for `STRUCTURED_POINTS` files.

mod format;
mod grid;
mod reader;

pub use format::{decode_name, AttributeKind, DataType, FileEncoding};
pub use grid::{ArrayValues, Attributes, DataArray, StructuredGrid};
pub use reader::{read_legacy, DecodeOptions};

use crate::util::{Dimensions, Result};

/// Decoder for decompressed snapshot payloads.
pub trait DatasetDecoder {
    /// Dimensions of the grid in `payload`, decoding as little as possible.
    fn probe_dimensions(&self, payload: &[u8]) -> Result<Dimensions>;

    /// Fully decode `payload`.
    fn decode(&self, payload: &[u8]) -> Result<StructuredGrid>;
}

/// [`DatasetDecoder`] for legacy VTK structured points.
///
/// Decodes with [`DecodeOptions::full`] unless configured otherwise.
#[derive(Clone, Debug)]
pub struct LegacyDecoder {
    options: DecodeOptions,
}

impl LegacyDecoder {
    pub fn new() -> Self {
        Self::with_options(DecodeOptions::full())
    }

    pub fn with_options(options: DecodeOptions) -> Self {
        Self {
            options: DecodeOptions {
                geometry_only: false,
                ..options
            },
        }
    }

    #[inline]
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }
}

impl Default for LegacyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetDecoder for LegacyDecoder {
    fn probe_dimensions(&self, payload: &[u8]) -> Result<Dimensions> {
        read_legacy(payload, &DecodeOptions::geometry()).map(|grid| grid.dimensions)
    }

    fn decode(&self, payload: &[u8]) -> Result<StructuredGrid> {
        read_legacy(payload, &self.options)
    }
}
