//! Snapshot container and statistics.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::error::ScanWarning;
use crate::item::Item;
use crate::options::ScanOptions;
use crate::walk::{Descendants, Events};

/// Summary statistics for a captured tree.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TreeStats {
    /// Total number of files.
    pub total_files: u64,
    /// Total number of directories.
    pub total_dirs: u64,
    /// Total number of symbolic links.
    pub total_symlinks: u64,
    /// Total primary-stream bytes across all files.
    pub total_bytes: u64,
    /// Maximum depth reached below the root.
    pub max_depth: u32,
}

impl TreeStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file entry.
    pub fn record_file(&mut self, size: u64, depth: u32) {
        self.total_files += 1;
        self.total_bytes += size;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a directory.
    pub fn record_dir(&mut self, depth: u32) {
        self.total_dirs += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a symlink.
    pub fn record_symlink(&mut self, depth: u32) {
        self.total_symlinks += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Total number of captured items.
    pub fn total_items(&self) -> u64 {
        self.total_files + self.total_dirs + self.total_symlinks
    }
}

/// An immutable tree of items captured from a filesystem path at one
/// point in time.
///
/// A snapshot is fully populated before it is returned and never reflects
/// later filesystem changes; that staleness is what makes two-sided
/// comparison consistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Root item of the tree.
    pub root: Item,

    /// Root path that was captured.
    pub root_path: PathBuf,

    /// When this snapshot was taken.
    pub scanned_at: SystemTime,

    /// Duration of the build pass.
    pub scan_duration: Duration,

    /// Options the snapshot was built with.
    pub options: ScanOptions,

    /// Summary statistics.
    pub stats: TreeStats,

    /// Warnings collected during the build; each corresponds to one
    /// omitted entry.
    pub warnings: Vec<ScanWarning>,
}

impl Snapshot {
    /// Create a new snapshot.
    pub fn new(
        root: Item,
        root_path: PathBuf,
        options: ScanOptions,
        stats: TreeStats,
        scan_duration: Duration,
        warnings: Vec<ScanWarning>,
    ) -> Self {
        Self {
            root,
            root_path,
            scanned_at: SystemTime::now(),
            scan_duration,
            options,
            stats,
            warnings,
        }
    }

    /// Whether every entry under the root was captured.
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Whether any entries were omitted during the build.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Flat pre-order traversal over all descendants of the root.
    pub fn descendants(&self) -> Descendants<'_> {
        self.root.descendants()
    }

    /// Structured enter/leaf/exit traversal over the tree.
    pub fn events(&self) -> Events<'_> {
        self.root.events()
    }

    /// Total number of files captured.
    pub fn total_files(&self) -> u64 {
        self.stats.total_files
    }

    /// Total number of directories captured.
    pub fn total_dirs(&self) -> u64 {
        self.stats.total_dirs
    }

    /// Total primary-stream bytes captured.
    pub fn total_bytes(&self) -> u64 {
        self.stats.total_bytes
    }
}
