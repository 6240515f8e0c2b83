//! Tree comparison engine for snapdiff.
//!
//! Walks two immutable snapshots in lockstep, matches children by name,
//! and classifies every difference: entries present on one side only,
//! matched names whose kinds differ, and matched pairs whose attributes
//! or stream contents diverge under the requested options.
//!
//! Differences arrive in the same deterministic pre-order as the
//! snapshot traversal, whether consumed through the streaming callback
//! or the collected report. A removed or added subtree is reported once,
//! at its root.
//!
//! # Example
//!
//! ```rust,no_run
//! use snapdiff_diff::{ComparisonOptions, TreeComparator};
//! use snapdiff_scan::{FsReader, ScanOptions, SnapshotScanner};
//!
//! let scanner = SnapshotScanner::new();
//! let options = ScanOptions::default();
//! let left = scanner.scan("/backups/monday", &options).unwrap();
//! let right = scanner.scan("/backups/tuesday", &options).unwrap();
//!
//! let comparator = TreeComparator::new(
//!     FsReader::new(),
//!     ComparisonOptions::OWNERSHIP | ComparisonOptions::CONTENT,
//! );
//! let report = comparator.compare(&left, &right);
//! for record in &report.records {
//!     println!("{:?} {}", record.flags, record.relative_path.display());
//! }
//! ```

mod compare;
mod content;
mod flags;

pub use compare::{DiffEntry, DiffRecord, DiffReport, DiffStats, TreeComparator};
pub use flags::{ChangeFlags, ComparisonOptions};

// Re-export core types for convenience
pub use snapdiff_core::{Item, ItemKind, ReadError, Snapshot, StreamKind, StreamReader};
