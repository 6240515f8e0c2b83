//! Snapshot tree node types.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Timestamps captured for an item at snapshot time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    /// Last modification time.
    pub modified: SystemTime,
    /// Creation time (platform-dependent, absent where unsupported).
    pub created: Option<SystemTime>,
}

impl Timestamps {
    /// Create timestamps with modification and creation times.
    pub fn new(modified: SystemTime, created: Option<SystemTime>) -> Self {
        Self { modified, created }
    }

    /// Create timestamps with only a modification time.
    pub fn with_modified(modified: SystemTime) -> Self {
        Self {
            modified,
            created: None,
        }
    }
}

/// Kind-specific payload of an item. Exactly one kind per item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ItemKind {
    /// Regular file with its stream byte lengths.
    File {
        /// Primary stream byte length.
        data_size: u64,
        /// Alternate stream byte length (zero where unsupported or absent).
        resource_size: u64,
    },
    /// Directory with children in byte-wise name order, fixed at construction.
    Directory { children: Vec<Item> },
    /// Symbolic link. The target is never resolved or traversed.
    Symlink,
}

impl ItemKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, ItemKind::Directory { .. })
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, ItemKind::File { .. })
    }

    /// Check if this is a symlink.
    pub fn is_symlink(&self) -> bool {
        matches!(self, ItemKind::Symlink)
    }
}

/// One filesystem entry captured in a snapshot.
///
/// Items are built once and never mutated. The parent is not stored;
/// traversal passes parent context explicitly, so the tree owns its
/// children without back-references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Final path component.
    pub name: CompactString,

    /// Full path from the volume root.
    pub absolute_path: PathBuf,

    /// Path relative to the snapshot root; empty for the root item.
    pub relative_path: PathBuf,

    /// Owner user id at snapshot time.
    pub uid: u32,

    /// Owner group id at snapshot time.
    pub gid: u32,

    /// POSIX permission bits, masked to `0o7777`.
    pub permissions: u32,

    /// Timestamps captured at snapshot time.
    pub timestamps: Timestamps,

    /// Kind-specific payload.
    pub kind: ItemKind,
}

impl Item {
    /// Create a new file item.
    #[allow(clippy::too_many_arguments)]
    pub fn new_file(
        name: impl Into<CompactString>,
        absolute_path: impl Into<PathBuf>,
        relative_path: impl Into<PathBuf>,
        uid: u32,
        gid: u32,
        permissions: u32,
        timestamps: Timestamps,
        data_size: u64,
        resource_size: u64,
    ) -> Self {
        Self {
            name: name.into(),
            absolute_path: absolute_path.into(),
            relative_path: relative_path.into(),
            uid,
            gid,
            permissions,
            timestamps,
            kind: ItemKind::File {
                data_size,
                resource_size,
            },
        }
    }

    /// Create a new directory item. Children are sorted by name here,
    /// so the stored order is deterministic regardless of listing order.
    #[allow(clippy::too_many_arguments)]
    pub fn new_directory(
        name: impl Into<CompactString>,
        absolute_path: impl Into<PathBuf>,
        relative_path: impl Into<PathBuf>,
        uid: u32,
        gid: u32,
        permissions: u32,
        timestamps: Timestamps,
        mut children: Vec<Item>,
    ) -> Self {
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            name: name.into(),
            absolute_path: absolute_path.into(),
            relative_path: relative_path.into(),
            uid,
            gid,
            permissions,
            timestamps,
            kind: ItemKind::Directory { children },
        }
    }

    /// Create a new symlink item.
    pub fn new_symlink(
        name: impl Into<CompactString>,
        absolute_path: impl Into<PathBuf>,
        relative_path: impl Into<PathBuf>,
        uid: u32,
        gid: u32,
        permissions: u32,
        timestamps: Timestamps,
    ) -> Self {
        Self {
            name: name.into(),
            absolute_path: absolute_path.into(),
            relative_path: relative_path.into(),
            uid,
            gid,
            permissions,
            timestamps,
            kind: ItemKind::Symlink,
        }
    }

    /// Check if this item is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if this item is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Check if this item is a symlink.
    pub fn is_symlink(&self) -> bool {
        self.kind.is_symlink()
    }

    /// Children in stored (name-sorted) order; empty for non-directories.
    pub fn children(&self) -> &[Item] {
        match &self.kind {
            ItemKind::Directory { children } => children,
            _ => &[],
        }
    }

    /// Primary stream byte length, for files.
    pub fn data_size(&self) -> Option<u64> {
        match self.kind {
            ItemKind::File { data_size, .. } => Some(data_size),
            _ => None,
        }
    }

    /// Alternate stream byte length, for files.
    pub fn resource_size(&self) -> Option<u64> {
        match self.kind {
            ItemKind::File { resource_size, .. } => Some(resource_size),
            _ => None,
        }
    }

    /// Path relative to the snapshot root.
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }
}
