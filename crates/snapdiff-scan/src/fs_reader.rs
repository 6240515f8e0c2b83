//! std::fs-backed metadata and stream access.

use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use snapdiff_core::{
    MetadataReader, RawKind, RawMetadata, ReadError, StreamKind, StreamReader, Timestamps,
};

/// Filesystem-backed reader used by default for building snapshots and
/// for content comparison.
///
/// `stat` has lstat semantics; symlinks are reported, never followed.
/// Stream reads open and release the underlying file within one call.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl FsReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }
}

impl MetadataReader for FsReader {
    fn stat(&self, path: &Path) -> io::Result<RawMetadata> {
        let metadata = fs::symlink_metadata(path)?;
        let file_type = metadata.file_type();

        let kind = if file_type.is_dir() {
            RawKind::Directory
        } else if file_type.is_file() {
            RawKind::File
        } else if file_type.is_symlink() {
            RawKind::Symlink
        } else {
            RawKind::Other
        };

        let (data_size, resource_size) = if kind == RawKind::File {
            (metadata.len(), resource_fork_len(path))
        } else {
            (0, 0)
        };

        Ok(RawMetadata {
            kind,
            uid: get_uid(&metadata),
            gid: get_gid(&metadata),
            permissions: get_mode(&metadata) & 0o7777,
            timestamps: Timestamps::new(
                metadata.modified().unwrap_or(UNIX_EPOCH),
                metadata.created().ok(),
            ),
            data_size,
            resource_size,
        })
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            entries.push(entry?.path());
        }
        Ok(entries)
    }
}

impl StreamReader for FsReader {
    fn read_chunk(
        &self,
        path: &Path,
        stream: StreamKind,
        offset: u64,
        buf: &mut [u8],
    ) -> Result<usize, ReadError> {
        match stream {
            StreamKind::Data => {
                let mut file = File::open(path).map_err(|e| ReadError::io(path, e))?;
                file.seek(SeekFrom::Start(offset))
                    .map_err(|e| ReadError::io(path, e))?;
                file.read(buf).map_err(|e| ReadError::io(path, e))
            }
            StreamKind::Resource => read_resource_chunk(path, offset, buf),
        }
    }
}

// Cross-platform metadata helpers

/// Get the owner user id from metadata.
#[cfg(unix)]
fn get_uid(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    metadata.uid()
}

#[cfg(not(unix))]
fn get_uid(_metadata: &fs::Metadata) -> u32 {
    0
}

/// Get the owner group id from metadata.
#[cfg(unix)]
fn get_gid(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    metadata.gid()
}

#[cfg(not(unix))]
fn get_gid(_metadata: &fs::Metadata) -> u32 {
    0
}

/// Get the full mode bits from metadata.
#[cfg(unix)]
fn get_mode(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    metadata.mode()
}

#[cfg(not(unix))]
fn get_mode(_metadata: &fs::Metadata) -> u32 {
    0
}

// Alternate stream access. The resource fork is exposed as an extended
// attribute on macOS; elsewhere alternate streams report as absent.

#[cfg(all(target_os = "macos", feature = "resource-fork"))]
const RESOURCE_FORK_XATTR: &str = "com.apple.ResourceFork";

#[cfg(all(target_os = "macos", feature = "resource-fork"))]
fn resource_fork_len(path: &Path) -> u64 {
    xattr::get(path, RESOURCE_FORK_XATTR)
        .ok()
        .flatten()
        .map(|data| data.len() as u64)
        .unwrap_or(0)
}

#[cfg(not(all(target_os = "macos", feature = "resource-fork")))]
fn resource_fork_len(_path: &Path) -> u64 {
    0
}

#[cfg(all(target_os = "macos", feature = "resource-fork"))]
fn read_resource_chunk(path: &Path, offset: u64, buf: &mut [u8]) -> Result<usize, ReadError> {
    let data = xattr::get(path, RESOURCE_FORK_XATTR)
        .map_err(|e| ReadError::io(path, e))?
        .unwrap_or_default();
    let start = (offset as usize).min(data.len());
    let end = (start + buf.len()).min(data.len());
    buf[..end - start].copy_from_slice(&data[start..end]);
    Ok(end - start)
}

#[cfg(not(all(target_os = "macos", feature = "resource-fork")))]
fn read_resource_chunk(_path: &Path, _offset: u64, _buf: &mut [u8]) -> Result<usize, ReadError> {
    Ok(0)
}
