//! Row and config document loaders.

use std::path::Path;

use serde_json::Value;

use crate::loaders::{LoadResult, read_file};

/// Loader for a JSON array of positional rows.
pub struct RowsLoader;

impl RowsLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<Value>> {
        let content = read_file(path)?;
        let rows: Vec<Value> = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse rows in {}: {}", path.display(), e))?;
        Ok(rows)
    }
}

/// Loader for a raw configuration document.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Reads the document without interpreting it; ingestion happens downstream.
    pub fn load(path: &Path) -> LoadResult<Value> {
        let content = read_file(path)?;
        serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config JSON {}: {}", path.display(), e))
    }
}
