//! Loaders for sheet dumps stored on disk.
//!
//! A dump is the raw JSON the remote sheet would return, saved to files so
//! the compendium can be browsed offline or under test.

pub mod dump;
pub mod rows;

pub use dump::SheetDump;
pub use rows::{ConfigLoader, RowsLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
