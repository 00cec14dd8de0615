//! Directory of sheet dumps.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::loaders::{ConfigLoader, LoadResult, RowsLoader};

/// A directory holding saved sheet responses.
///
/// ```text
/// dump_dir/
/// ├── creatures.json
/// ├── moves.json
/// └── config.json   (optional)
/// ```
pub struct SheetDump {
    dir: PathBuf,
}

impl SheetDump {
    pub const CREATURES_FILE: &'static str = "creatures.json";
    pub const MOVES_FILE: &'static str = "moves.json";
    pub const CONFIG_FILE: &'static str = "config.json";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn load_creature_rows(&self) -> LoadResult<Vec<Value>> {
        RowsLoader::load(&self.dir.join(Self::CREATURES_FILE))
    }

    pub fn load_move_rows(&self) -> LoadResult<Vec<Value>> {
        RowsLoader::load(&self.dir.join(Self::MOVES_FILE))
    }

    /// The config document, or `None` when the dump has none.
    pub fn load_config(&self) -> LoadResult<Option<Value>> {
        let path = self.dir.join(Self::CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }
        ConfigLoader::load(&path).map(Some)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dump_round_trip() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(SheetDump::CREATURES_FILE),
            r#"[["", 1, "Sproutle"]]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join(SheetDump::MOVES_FILE), "[]").unwrap();

        let dump = SheetDump::new(dir.path());
        assert_eq!(dump.load_creature_rows().unwrap().len(), 1);
        assert!(dump.load_move_rows().unwrap().is_empty());
        assert!(dump.load_config().unwrap().is_none());
        assert_eq!(dump.dir(), dir.path());
    }

    #[test]
    fn test_missing_rows_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = SheetDump::new(dir.path()).load_move_rows().unwrap_err();
        assert!(err.to_string().contains("moves.json"));
    }
}
