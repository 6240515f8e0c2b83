//! Core types for snapdiff.
//!
//! This crate provides the immutable snapshot tree model, the traversal
//! iterators over built trees, and the reader traits through which the
//! builder and comparator touch the filesystem.

mod error;
mod item;
mod options;
mod reader;
mod snapshot;
mod walk;

pub use error::{ReadError, ScanError, ScanWarning, WarningKind};
pub use item::{Item, ItemKind, Timestamps};
pub use options::{ScanOptions, ScanOptionsBuilder};
pub use reader::{MetadataReader, RawKind, RawMetadata, StreamKind, StreamReader};
pub use snapshot::{Snapshot, TreeStats};
pub use walk::{Descendants, Events, WalkEvent};
