//! Reader traits through which snapshots and content checks touch the
//! filesystem.
//!
//! The builder consumes a [`MetadataReader`]; the comparator's content
//! option consumes a [`StreamReader`]. Everything else in this crate is
//! pure in-memory tree work.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::ReadError;
use crate::item::Timestamps;

/// Kind of a filesystem entry as reported by a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Anything else (sockets, devices, ...). Not captured in snapshots.
    Other,
}

/// Raw attributes of one filesystem entry.
#[derive(Debug, Clone)]
pub struct RawMetadata {
    /// Entry kind.
    pub kind: RawKind,
    /// Owner user id.
    pub uid: u32,
    /// Owner group id.
    pub gid: u32,
    /// POSIX permission bits, masked to `0o7777`.
    pub permissions: u32,
    /// Modification and creation times.
    pub timestamps: Timestamps,
    /// Primary stream byte length (zero for non-files).
    pub data_size: u64,
    /// Alternate stream byte length (zero for non-files or where
    /// unsupported).
    pub resource_size: u64,
}

/// Which stream of a file to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// The primary data stream.
    Data,
    /// The alternate (resource) stream.
    Resource,
}

/// Source of entry metadata for snapshot building.
///
/// `stat` has lstat semantics: symlinks are reported as symlinks, never
/// followed.
pub trait MetadataReader {
    /// Read the raw attributes of one entry.
    fn stat(&self, path: &Path) -> io::Result<RawMetadata>;

    /// List the entries of a directory. Order is not significant; the
    /// builder sorts children by name.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Source of stream bytes for content comparison.
///
/// Reads are stateless: each call opens, reads and releases whatever it
/// needs, so nothing is held across pairs. A short read is permitted;
/// returning 0 before the requested range is exhausted means the stream
/// ended.
pub trait StreamReader {
    /// Read up to `buf.len()` bytes of the given stream starting at
    /// `offset`. Returns the number of bytes read, 0 at end of stream.
    fn read_chunk(
        &self,
        path: &Path,
        stream: StreamKind,
        offset: u64,
        buf: &mut [u8],
    ) -> Result<usize, ReadError>;
}
