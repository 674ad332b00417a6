//! Error types for the boxvtk library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for box archive operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Container is missing, unreadable, or its member table is corrupt
    #[error("Cannot open archive {}: {reason}", path.display())]
    ArchiveOpen { path: PathBuf, reason: String },

    /// Member name does not follow the `<a>_<b>_<c>...` token convention
    #[error("Invalid member name: {0}")]
    InvalidMemberName(String),

    /// Snapshot header line could not be parsed
    #[error("Malformed header {line:?}: {reason}")]
    MalformedHeader { line: String, reason: String },

    /// Payload is not a decodable legacy dataset (or failed to decompress)
    #[error("Decode error: {0}")]
    Decode(String),

    /// Archive region is truncated
    #[error("Unexpected end of file at position {0}")]
    UnexpectedEof(u64),

    /// Memory mapping failed
    #[error("Memory mapping failed: {0}")]
    MmapFailed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a malformed header error for `line`.
    pub fn malformed(line: &str, reason: impl Into<String>) -> Self {
        Self::MalformedHeader {
            line: line.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether a lenient archive scan may skip the offending member and go on.
    ///
    /// Only per-member failures qualify; anything touching the container
    /// itself is fatal to the scan.
    pub fn is_member_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidMemberName(_) | Self::MalformedHeader { .. } | Self::Decode(_)
        )
    }
}

/// Result type alias for boxvtk operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::InvalidMemberName("box.zst".into());
        assert!(e.to_string().contains("box.zst"));

        let e = Error::malformed("variable ham", "expected 3 fields");
        assert!(e.to_string().contains("variable ham"));
        assert!(e.to_string().contains("3 fields"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_member_local() {
        assert!(Error::decode("bad").is_member_local());
        assert!(Error::InvalidMemberName("x".into()).is_member_local());
        assert!(!Error::UnexpectedEof(4).is_member_local());
        assert!(!Error::ArchiveOpen { path: "a.box".into(), reason: "gone".into() }.is_member_local());
    }
}
