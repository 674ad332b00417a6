//! Box archive reader: one open container plus its member table.

use std::borrow::Cow;
use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use parking_lot::RwLock;
use tracing::{debug, trace};

use super::format::TAR_BLOCK_SIZE;
use crate::core::level_suffix;
use crate::util::{Error, Result};

/// One regular-file entry of the container.
///
/// Members only describe where their payload lives; the bytes are fetched
/// through the [`BoxArchive`] that produced them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveMember {
    /// Position in archive-listing order (regular files only).
    pub index: usize,
    /// Full path stored in the tar entry.
    pub name: String,
    /// Absolute offset of the payload within the archive.
    pub data_pos: u64,
    /// Payload size in bytes.
    pub size: u64,
}

/// Backing storage for the archive bytes.
/// Supports both memory-mapped and buffered I/O modes.
struct ArchiveStreams {
    inner: StreamsInner,
    size: u64,
}

enum StreamsInner {
    /// Memory-mapped file (preferred for large files)
    Mmap(Mmap),
    /// Buffered file access (fallback)
    File(RwLock<File>),
}

impl ArchiveStreams {
    fn open(path: &Path, use_mmap: bool) -> Result<Self> {
        let file = File::open(path).map_err(|e| open_error(path, e))?;
        let size = file.metadata().map_err(|e| open_error(path, e))?.len();

        if size == 0 {
            return Err(open_error(path, "empty file"));
        }

        let inner = if use_mmap {
            // Safety: the file is opened read-only; concurrent truncation by
            // another process is outside what this reader guards against.
            let mmap = unsafe { Mmap::map(&file) }.map_err(|e| Error::MmapFailed(e.to_string()))?;
            StreamsInner::Mmap(mmap)
        } else {
            StreamsInner::File(RwLock::new(file))
        };

        Ok(Self { inner, size })
    }

    /// Read `len` bytes at `pos`, borrowing from the map when possible.
    fn read_bytes(&self, pos: u64, len: u64) -> Result<Cow<'_, [u8]>> {
        let end = pos.checked_add(len).ok_or(Error::UnexpectedEof(u64::MAX))?;
        if end > self.size {
            return Err(Error::UnexpectedEof(end));
        }

        match &self.inner {
            StreamsInner::Mmap(mmap) => Ok(Cow::Borrowed(&mmap[pos as usize..end as usize])),
            StreamsInner::File(file) => {
                let mut f = file.write();
                f.seek(SeekFrom::Start(pos))?;
                let mut buf = vec![0u8; len as usize];
                f.read_exact(&mut buf)?;
                Ok(Cow::Owned(buf))
            }
        }
    }

    /// Walk the tar headers once and collect the regular-file members.
    fn scan(&self) -> std::io::Result<Vec<ArchiveMember>> {
        match &self.inner {
            StreamsInner::Mmap(mmap) => scan_members(Cursor::new(&mmap[..])),
            StreamsInner::File(file) => {
                let mut f = file.write();
                f.seek(SeekFrom::Start(0))?;
                scan_members(&mut *f)
            }
        }
    }
}

fn scan_members<R: Read + Seek>(reader: R) -> std::io::Result<Vec<ArchiveMember>> {
    let mut archive = tar::Archive::new(reader);
    let mut members = Vec::new();

    for entry in archive.entries_with_seek()? {
        let entry = entry?;
        let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        let entry_type = entry.header().entry_type();
        if !entry_type.is_file() {
            trace!(name = %name, ?entry_type, "skipping non-file entry");
            continue;
        }
        members.push(ArchiveMember {
            index: members.len(),
            name,
            data_pos: entry.raw_file_position(),
            size: entry.size(),
        });
    }

    Ok(members)
}

fn open_error(path: &Path, reason: impl ToString) -> Error {
    Error::ArchiveOpen {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// An open box archive.
///
/// Owns the file mapping for its whole lifetime, so member payloads can be
/// sliced out repeatedly without re-opening the container. Dropping the
/// archive (or calling [`close`](Self::close)) releases the handle.
pub struct BoxArchive {
    path: PathBuf,
    streams: ArchiveStreams,
    members: Vec<ArchiveMember>,
}

impl BoxArchive {
    /// Open an archive for reading with memory mapping.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_opts(path, true)
    }

    /// Open an archive with optional memory mapping.
    pub fn open_opts(path: impl AsRef<Path>, use_mmap: bool) -> Result<Self> {
        let path = path.as_ref();
        let streams = ArchiveStreams::open(path, use_mmap)?;

        if streams.size < TAR_BLOCK_SIZE {
            return Err(open_error(path, format!("{} bytes is too short for a tar archive", streams.size)));
        }

        let members = streams.scan().map_err(|e| open_error(path, e))?;
        for member in &members {
            let end = member.data_pos.checked_add(member.size);
            if end.map_or(true, |end| end > streams.size) {
                return Err(open_error(path, format!("member {} is truncated", member.name)));
            }
        }

        debug!(path = %path.display(), members = members.len(), "opened archive");
        Ok(Self {
            path: path.to_path_buf(),
            streams,
            members,
        })
    }

    /// Path the archive was opened from.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total archive size in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.streams.size
    }

    /// Whether the archive is served from a memory map.
    #[inline]
    pub fn is_mapped(&self) -> bool {
        matches!(self.streams.inner, StreamsInner::Mmap(_))
    }

    /// Regular-file members in archive-listing order.
    #[inline]
    pub fn members(&self) -> &[ArchiveMember] {
        &self.members
    }

    /// Number of regular-file members.
    #[inline]
    pub fn num_members(&self) -> usize {
        self.members.len()
    }

    /// Find a member by its full name.
    pub fn member(&self, name: &str) -> Option<&ArchiveMember> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Raw (still compressed) payload of `member`.
    pub fn member_bytes(&self, member: &ArchiveMember) -> Result<Cow<'_, [u8]>> {
        self.streams.read_bytes(member.data_pos, member.size)
    }

    /// Distinct level suffixes present, in order of first appearance.
    ///
    /// `None` stands for unleveled members. Names that break the naming
    /// convention are ignored.
    pub fn levels(&self) -> Vec<Option<char>> {
        let mut levels = Vec::new();
        for member in &self.members {
            if let Ok(level) = level_suffix(&member.name) {
                if !levels.contains(&level) {
                    levels.push(level);
                }
            }
        }
        levels
    }

    /// Close the archive, releasing the file handle.
    pub fn close(self) {
        debug!(path = %self.path.display(), "closed archive");
    }
}

impl std::fmt::Debug for BoxArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxArchive")
            .field("path", &self.path)
            .field("size", &self.streams.size)
            .field("mapped", &self.is_mapped())
            .field("members", &self.members.len())
            .finish()
    }
}
