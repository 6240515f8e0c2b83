//! Snapshot building engine for snapdiff.
//!
//! This crate walks a filesystem subtree once and produces the immutable
//! [`Snapshot`] tree defined in `snapdiff-core`. The walk is a single
//! synchronous depth-first pass; unreadable entries below the root are
//! omitted and collected as warnings, so a partial snapshot is still a
//! valid (and marked) snapshot.
//!
//! # Example
//!
//! ```rust,no_run
//! use snapdiff_scan::{ScanOptions, SnapshotScanner};
//!
//! let options = ScanOptions::default();
//! let scanner = SnapshotScanner::new();
//! let snapshot = scanner.scan("/path/to/tree", &options).unwrap();
//!
//! println!("{} files, {} bytes", snapshot.total_files(), snapshot.total_bytes());
//! if !snapshot.is_complete() {
//!     eprintln!("{} entries omitted", snapshot.warnings.len());
//! }
//! ```
//!
//! # Progress Monitoring
//!
//! Subscribe to progress updates before scanning:
//!
//! ```rust,no_run
//! use snapdiff_scan::{ScanOptions, SnapshotScanner};
//!
//! let scanner = SnapshotScanner::new();
//! let mut progress_rx = scanner.subscribe();
//!
//! std::thread::spawn(move || {
//!     while let Ok(progress) = progress_rx.blocking_recv() {
//!         eprintln!("{} items seen", progress.items_seen());
//!     }
//! });
//!
//! let snapshot = scanner.scan("/path/to/tree", &ScanOptions::default()).unwrap();
//! # let _ = snapshot;
//! ```

mod fs_reader;
mod progress;
mod scanner;

pub use fs_reader::FsReader;
pub use progress::ScanProgress;
pub use scanner::SnapshotScanner;

// Re-export core types for convenience
pub use snapdiff_core::{
    Item, ItemKind, MetadataReader, RawKind, RawMetadata, ScanError, ScanOptions, ScanWarning,
    Snapshot, StreamKind, StreamReader, Timestamps, TreeStats, WarningKind,
};
