//! Lockstep comparison of two snapshot trees.

use std::cmp::Ordering;
use std::mem;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use snapdiff_core::{Item, ItemKind, ReadError, Snapshot, StreamKind, StreamReader};

use crate::content::streams_equal;
use crate::flags::{ChangeFlags, ComparisonOptions};

/// One classified difference, borrowed from the compared trees.
#[derive(Debug)]
pub struct DiffEntry<'a> {
    /// OR of every flag that fired for this pair.
    pub flags: ChangeFlags,
    /// Left-side item; absent for additions.
    pub left: Option<&'a Item>,
    /// Right-side item; absent for removals.
    pub right: Option<&'a Item>,
    /// Content read failure for this pair, reported alongside whatever
    /// flags were already determined.
    pub error: Option<ReadError>,
}

impl DiffEntry<'_> {
    /// Path of this position relative to its snapshot root.
    pub fn relative_path(&self) -> &Path {
        self.left
            .or(self.right)
            .map(|item| item.relative_path())
            .unwrap_or_else(|| Path::new(""))
    }
}

/// Owned form of a difference, as collected into a [`DiffReport`].
#[derive(Debug, Clone)]
pub struct DiffRecord {
    /// OR of every flag that fired for this pair.
    pub flags: ChangeFlags,
    /// Path relative to the snapshot roots.
    pub relative_path: PathBuf,
    /// Absolute path on the left side, if present there.
    pub left_path: Option<PathBuf>,
    /// Absolute path on the right side, if present there.
    pub right_path: Option<PathBuf>,
    /// Rendered content read failure, if one occurred for this pair.
    pub read_error: Option<String>,
}

impl From<DiffEntry<'_>> for DiffRecord {
    fn from(entry: DiffEntry<'_>) -> Self {
        Self {
            flags: entry.flags,
            relative_path: entry.relative_path().to_path_buf(),
            left_path: entry.left.map(|i| i.absolute_path.clone()),
            right_path: entry.right.map(|i| i.absolute_path.clone()),
            read_error: entry.error.map(|e| e.to_string()),
        }
    }
}

/// Counters accumulated over one comparison walk.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffStats {
    /// Matched pairs classified (including the root pair).
    pub pairs_compared: u64,
    /// Entries present only on the right.
    pub added: u64,
    /// Entries present only on the left.
    pub removed: u64,
    /// Matched names whose kinds differ.
    pub replaced: u64,
    /// Matched pairs with at least one modification flag.
    pub modified: u64,
    /// Stream bytes read for content checks.
    pub bytes_read: u64,
    /// Pairs whose content check failed.
    pub read_errors: u64,
}

impl DiffStats {
    /// Total number of reported differences.
    pub fn total_differences(&self) -> u64 {
        self.added + self.removed + self.replaced + self.modified
    }
}

/// Collected result of comparing two snapshots.
#[derive(Debug, Clone, Default)]
pub struct DiffReport {
    /// Differences in deterministic pre-order.
    pub records: Vec<DiffRecord>,
    /// Counters for the whole walk.
    pub stats: DiffStats,
}

impl DiffReport {
    /// Whether the walk found no differences and no read failures.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of emitted entries.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether any real difference (not just a read failure) was found.
    pub fn has_differences(&self) -> bool {
        self.records.iter().any(|r| !r.flags.is_empty())
    }
}

/// Compares two snapshot trees pair by pair in deterministic pre-order.
///
/// Children are matched by name, byte-exact and case-sensitive. All kind
/// and attribute data comes from the snapshots themselves; only the
/// `CONTENT` option touches storage again, through the stream reader.
/// Because both trees are immutable, one comparator can be used from any
/// number of concurrent walks.
pub struct TreeComparator<R> {
    reader: R,
    options: ComparisonOptions,
}

impl<R: StreamReader> TreeComparator<R> {
    /// Create a comparator over a stream reader.
    ///
    /// The reader is consulted only when `options` contains
    /// [`ComparisonOptions::CONTENT`].
    pub fn new(reader: R, options: ComparisonOptions) -> Self {
        Self { reader, options }
    }

    /// The options this comparator was built with.
    pub fn options(&self) -> ComparisonOptions {
        self.options
    }

    /// Compare two snapshots and collect every difference.
    pub fn compare(&self, left: &Snapshot, right: &Snapshot) -> DiffReport {
        let mut records = Vec::new();
        let stats = self.compare_with(left, right, |entry| records.push(DiffRecord::from(entry)));
        DiffReport { records, stats }
    }

    /// Compare two snapshots, streaming each difference into `sink` in
    /// pre-order. The two roots are matched by convention, regardless of
    /// their names.
    pub fn compare_with<'a, F>(&self, left: &'a Snapshot, right: &'a Snapshot, sink: F) -> DiffStats
    where
        F: FnMut(DiffEntry<'a>),
    {
        self.compare_trees(&left.root, &right.root, sink)
    }

    /// Compare two item trees directly.
    pub fn compare_trees<'a, F>(&self, left: &'a Item, right: &'a Item, mut sink: F) -> DiffStats
    where
        F: FnMut(DiffEntry<'a>),
    {
        debug!(
            left = %left.absolute_path.display(),
            right = %right.absolute_path.display(),
            options = ?self.options,
            "comparing trees"
        );
        let mut stats = DiffStats::default();
        self.compare_pair(left, right, &mut stats, &mut sink);
        stats
    }

    /// Classify one matched pair, then recurse if both sides are
    /// directories.
    fn compare_pair<'a, F>(
        &self,
        left: &'a Item,
        right: &'a Item,
        stats: &mut DiffStats,
        sink: &mut F,
    ) where
        F: FnMut(DiffEntry<'a>),
    {
        stats.pairs_compared += 1;

        // Mismatched kinds are replacements; their attributes are never
        // diffed and neither subtree is descended into.
        if mem::discriminant(&left.kind) != mem::discriminant(&right.kind) {
            stats.replaced += 1;
            sink(DiffEntry {
                flags: ChangeFlags::REPLACED,
                left: Some(left),
                right: Some(right),
                error: None,
            });
            return;
        }

        let mut flags = ChangeFlags::empty();

        if self.options.contains(ComparisonOptions::OWNERSHIP) {
            if left.permissions != right.permissions {
                flags |= ChangeFlags::MODIFIED_PERMISSIONS;
            }
            if left.gid != right.gid {
                flags |= ChangeFlags::MODIFIED_GROUP_ID;
            }
            if left.uid != right.uid {
                flags |= ChangeFlags::MODIFIED_USER_ID;
            }
        }

        if self.options.contains(ComparisonOptions::PROPERTIES) {
            if left.data_size() != right.data_size()
                || left.resource_size() != right.resource_size()
            {
                flags |= ChangeFlags::MODIFIED_FILE_SIZE;
            }
            if left.timestamps != right.timestamps {
                flags |= ChangeFlags::MODIFIED_FILE_DATE;
            }
        }

        let mut error = None;
        if self.options.contains(ComparisonOptions::CONTENT) {
            if let (
                ItemKind::File {
                    data_size: left_data,
                    resource_size: left_resource,
                },
                ItemKind::File {
                    data_size: right_data,
                    resource_size: right_resource,
                },
            ) = (&left.kind, &right.kind)
            {
                let (content_flags, content_error) = self.check_content(
                    left,
                    right,
                    *left_data,
                    *right_data,
                    *left_resource,
                    *right_resource,
                    stats,
                );
                flags |= content_flags;
                error = content_error;
            }
        }

        if !flags.is_empty() || error.is_some() {
            if flags.is_modification() {
                stats.modified += 1;
            }
            if error.is_some() {
                stats.read_errors += 1;
            }
            sink(DiffEntry {
                flags,
                left: Some(left),
                right: Some(right),
                error,
            });
        }

        if let (ItemKind::Directory { children: left_children }, ItemKind::Directory { children: right_children }) =
            (&left.kind, &right.kind)
        {
            self.compare_children(left_children, right_children, stats, sink);
        }
    }

    /// Merge two name-sorted child lists, emitting differences in name
    /// order. Names within a directory are unique, so each name appears
    /// on at most one side of the merge step.
    fn compare_children<'a, F>(
        &self,
        left: &'a [Item],
        right: &'a [Item],
        stats: &mut DiffStats,
        sink: &mut F,
    ) where
        F: FnMut(DiffEntry<'a>),
    {
        let mut i = 0;
        let mut j = 0;
        loop {
            match (left.get(i), right.get(j)) {
                (Some(l), Some(r)) => match l.name.cmp(&r.name) {
                    Ordering::Less => {
                        self.emit_removed(l, stats, sink);
                        i += 1;
                    }
                    Ordering::Greater => {
                        self.emit_added(r, stats, sink);
                        j += 1;
                    }
                    Ordering::Equal => {
                        self.compare_pair(l, r, stats, sink);
                        i += 1;
                        j += 1;
                    }
                },
                (Some(l), None) => {
                    self.emit_removed(l, stats, sink);
                    i += 1;
                }
                (None, Some(r)) => {
                    self.emit_added(r, stats, sink);
                    j += 1;
                }
                (None, None) => break,
            }
        }
    }

    /// A left-only entry: the whole subtree is implicitly removed, so only
    /// its root is reported and never descended into.
    fn emit_removed<'a, F>(&self, item: &'a Item, stats: &mut DiffStats, sink: &mut F)
    where
        F: FnMut(DiffEntry<'a>),
    {
        stats.removed += 1;
        sink(DiffEntry {
            flags: ChangeFlags::REMOVED,
            left: Some(item),
            right: None,
            error: None,
        });
    }

    /// A right-only entry, mirror of [`Self::emit_removed`].
    fn emit_added<'a, F>(&self, item: &'a Item, stats: &mut DiffStats, sink: &mut F)
    where
        F: FnMut(DiffEntry<'a>),
    {
        stats.added += 1;
        sink(DiffEntry {
            flags: ChangeFlags::ADDED,
            left: None,
            right: Some(item),
            error: None,
        });
    }

    /// Content check for a matched file pair. A size mismatch already
    /// proves stream inequality, so bytes are read only when sizes match.
    #[allow(clippy::too_many_arguments)]
    fn check_content(
        &self,
        left: &Item,
        right: &Item,
        left_data: u64,
        right_data: u64,
        left_resource: u64,
        right_resource: u64,
        stats: &mut DiffStats,
    ) -> (ChangeFlags, Option<ReadError>) {
        let mut flags = ChangeFlags::empty();

        if left_data != right_data {
            flags |= ChangeFlags::MODIFIED_DATA_CONTENT;
        } else if left_data > 0 {
            match streams_equal(
                &self.reader,
                &left.absolute_path,
                &right.absolute_path,
                StreamKind::Data,
                left_data,
                &mut stats.bytes_read,
            ) {
                Ok(true) => {}
                Ok(false) => flags |= ChangeFlags::MODIFIED_DATA_CONTENT,
                Err(err) => {
                    warn!(
                        path = %left.relative_path().display(),
                        error = %err,
                        "data stream read failed"
                    );
                    return (flags, Some(err));
                }
            }
        }

        if left_resource != right_resource {
            flags |= ChangeFlags::MODIFIED_RESOURCE_CONTENT;
        } else if left_resource > 0 {
            match streams_equal(
                &self.reader,
                &left.absolute_path,
                &right.absolute_path,
                StreamKind::Resource,
                left_resource,
                &mut stats.bytes_read,
            ) {
                Ok(true) => {}
                Ok(false) => flags |= ChangeFlags::MODIFIED_RESOURCE_CONTENT,
                Err(err) => {
                    warn!(
                        path = %left.relative_path().display(),
                        error = %err,
                        "resource stream read failed"
                    );
                    return (flags, Some(err));
                }
            }
        }

        (flags, None)
    }
}
