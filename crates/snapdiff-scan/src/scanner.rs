//! Recursive snapshot builder.

use std::path::Path;
use std::time::Instant;

use globset::GlobSet;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use snapdiff_core::{
    Item, MetadataReader, RawKind, RawMetadata, ScanError, ScanOptions, ScanWarning, Snapshot,
    TreeStats,
};

use crate::fs_reader::FsReader;
use crate::progress::ScanProgress;

/// Builds immutable snapshots in one synchronous depth-first pass.
///
/// The root must exist when `scan` is called; a race with concurrent
/// filesystem mutation during the walk is an accepted limitation. Failures
/// on the root abort the build, failures on entries below it omit the
/// entry and collect a warning instead.
pub struct SnapshotScanner<R = FsReader> {
    reader: R,
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl SnapshotScanner<FsReader> {
    /// Create a scanner backed by the local filesystem.
    pub fn new() -> Self {
        Self::with_reader(FsReader::new())
    }
}

impl Default for SnapshotScanner<FsReader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: MetadataReader> SnapshotScanner<R> {
    /// Create a scanner over a custom metadata source.
    pub fn with_reader(reader: R) -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            reader,
            progress_tx,
        }
    }

    /// Subscribe to progress updates for subsequent scans.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Capture a snapshot of the subtree rooted at `root`.
    ///
    /// The returned tree is fully populated and never mutated afterwards.
    pub fn scan(
        &self,
        root: impl AsRef<Path>,
        options: &ScanOptions,
    ) -> Result<Snapshot, ScanError> {
        let start = Instant::now();
        let root_path = root
            .as_ref()
            .canonicalize()
            .map_err(|e| ScanError::io(root.as_ref(), e))?;
        let ignore = options.compile_ignore()?;

        let metadata = self
            .reader
            .stat(&root_path)
            .map_err(|e| ScanError::io(&root_path, e))?;

        let mut cx = ScanContext {
            options,
            ignore,
            stats: TreeStats::new(),
            warnings: Vec::new(),
            entries_seen: 0,
            start,
        };

        let root_item = self.build_node(&root_path, Path::new(""), metadata, 0, &mut cx)?;

        debug!(
            path = %root_path.display(),
            files = cx.stats.total_files,
            dirs = cx.stats.total_dirs,
            warnings = cx.warnings.len(),
            "scan finished"
        );

        Ok(Snapshot::new(
            root_item,
            root_path,
            options.clone(),
            cx.stats,
            start.elapsed(),
            cx.warnings,
        ))
    }

    /// Build one item. Only the root (depth 0) can fail; deeper failures
    /// are handled by the caller through omission.
    fn build_node(
        &self,
        path: &Path,
        relative: &Path,
        metadata: RawMetadata,
        depth: u32,
        cx: &mut ScanContext<'_>,
    ) -> Result<Item, ScanError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        match metadata.kind {
            RawKind::File => {
                cx.stats.record_file(metadata.data_size, depth);
                Ok(Item::new_file(
                    name,
                    path,
                    relative,
                    metadata.uid,
                    metadata.gid,
                    metadata.permissions,
                    metadata.timestamps,
                    metadata.data_size,
                    metadata.resource_size,
                ))
            }
            RawKind::Symlink => {
                cx.stats.record_symlink(depth);
                Ok(Item::new_symlink(
                    name,
                    path,
                    relative,
                    metadata.uid,
                    metadata.gid,
                    metadata.permissions,
                    metadata.timestamps,
                ))
            }
            RawKind::Directory => {
                cx.stats.record_dir(depth);
                let children = self.build_children(path, relative, depth, cx)?;
                Ok(Item::new_directory(
                    name,
                    path,
                    relative,
                    metadata.uid,
                    metadata.gid,
                    metadata.permissions,
                    metadata.timestamps,
                    children,
                ))
            }
            RawKind::Other => Err(ScanError::Other {
                message: format!("Unsupported file type: {}", path.display()),
            }),
        }
    }

    fn build_children(
        &self,
        path: &Path,
        relative: &Path,
        depth: u32,
        cx: &mut ScanContext<'_>,
    ) -> Result<Vec<Item>, ScanError> {
        let listing = match self.reader.list_dir(path) {
            Ok(entries) => entries,
            Err(err) if depth == 0 => return Err(ScanError::io(path, err)),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "directory listing failed");
                cx.warnings.push(ScanWarning::read_error(path, &err));
                return Ok(Vec::new());
            }
        };

        let mut children = Vec::with_capacity(listing.len());
        for child_path in listing {
            let child_name = child_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            if cx.options.should_skip_hidden(&child_name) || cx.ignore.is_match(&child_name) {
                continue;
            }
            if cx.options.max_depth.is_some_and(|max| depth + 1 > max) {
                continue;
            }

            let child_meta = match self.reader.stat(&child_path) {
                Ok(m) => m,
                Err(err) => {
                    warn!(path = %child_path.display(), error = %err, "metadata read failed");
                    cx.warnings.push(ScanWarning::metadata_error(&child_path, &err));
                    continue;
                }
            };
            if child_meta.kind == RawKind::Other {
                debug!(path = %child_path.display(), "skipping special file");
                continue;
            }

            cx.record_entry(&child_path, &self.progress_tx);

            let child_rel = relative.join(&child_name);
            children.push(self.build_node(&child_path, &child_rel, child_meta, depth + 1, cx)?);
        }
        Ok(children)
    }
}

/// Per-scan mutable state threaded through the recursion.
struct ScanContext<'a> {
    options: &'a ScanOptions,
    ignore: GlobSet,
    stats: TreeStats,
    warnings: Vec<ScanWarning>,
    entries_seen: u64,
    start: Instant,
}

impl ScanContext<'_> {
    fn record_entry(&mut self, path: &Path, tx: &broadcast::Sender<ScanProgress>) {
        self.entries_seen += 1;
        if self.entries_seen % 1000 == 0 {
            let _ = tx.send(ScanProgress {
                files_seen: self.stats.total_files,
                dirs_seen: self.stats.total_dirs,
                bytes_seen: self.stats.total_bytes,
                current_path: path.to_path_buf(),
                warning_count: self.warnings.len() as u64,
                elapsed: self.start.elapsed(),
            });
        }
    }
}
