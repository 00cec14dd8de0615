//! In-process sources backed by fixed data.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dex_content::SheetDump;
use serde_json::Value;

use super::{DataSource, ImageProbe, Result, SourceError};

/// A [`DataSource`] serving fixed rows.
///
/// A dataset set to `None` behaves like an unreachable endpoint. Every call is
/// counted so callers can check whether the cache was used.
#[derive(Default)]
pub struct StaticDataSource {
    creatures: Option<Vec<Value>>,
    moves: Option<Vec<Value>>,
    config: Option<Value>,
    creature_fetches: AtomicUsize,
    move_fetches: AtomicUsize,
    config_fetches: AtomicUsize,
}

impl StaticDataSource {
    pub fn new(creatures: Vec<Value>, moves: Vec<Value>) -> Self {
        Self {
            creatures: Some(creatures),
            moves: Some(moves),
            ..Self::default()
        }
    }

    /// A source where every request fails.
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = Some(config);
        self
    }

    pub fn without_creatures(mut self) -> Self {
        self.creatures = None;
        self
    }

    pub fn without_moves(mut self) -> Self {
        self.moves = None;
        self
    }

    /// Serves the contents of a saved sheet dump.
    pub fn from_dump(dump: &SheetDump) -> Result<Self> {
        let creatures = dump
            .load_creature_rows()
            .map_err(|err| SourceError::Dump(format!("{err:#}")))?;
        let moves = dump
            .load_move_rows()
            .map_err(|err| SourceError::Dump(format!("{err:#}")))?;
        let config = dump
            .load_config()
            .map_err(|err| SourceError::Dump(format!("{err:#}")))?;

        Ok(Self {
            creatures: Some(creatures),
            moves: Some(moves),
            config,
            ..Self::default()
        })
    }

    pub fn creature_fetches(&self) -> usize {
        self.creature_fetches.load(Ordering::SeqCst)
    }

    pub fn move_fetches(&self) -> usize {
        self.move_fetches.load(Ordering::SeqCst)
    }

    pub fn config_fetches(&self) -> usize {
        self.config_fetches.load(Ordering::SeqCst)
    }
}

fn served<T: Clone>(value: &Option<T>, what: &str) -> Result<T> {
    value
        .clone()
        .ok_or_else(|| SourceError::Unavailable(format!("no {what} available")))
}

#[async_trait]
impl DataSource for StaticDataSource {
    async fn creature_rows(&self) -> Result<Vec<Value>> {
        self.creature_fetches.fetch_add(1, Ordering::SeqCst);
        served(&self.creatures, "creature rows")
    }

    async fn move_rows(&self) -> Result<Vec<Value>> {
        self.move_fetches.fetch_add(1, Ordering::SeqCst);
        served(&self.moves, "move rows")
    }

    async fn config_document(&self) -> Result<Value> {
        self.config_fetches.fetch_add(1, Ordering::SeqCst);
        served(&self.config, "config document")
    }
}

/// An [`ImageProbe`] that knows a fixed set of existing URLs.
#[derive(Clone, Debug, Default)]
pub struct StaticImageProbe {
    existing: HashSet<String>,
}

impl StaticImageProbe {
    pub fn new<I, S>(existing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            existing: existing.into_iter().map(Into::into).collect(),
        }
    }

    /// A probe for which no image exists.
    pub fn none() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageProbe for StaticImageProbe {
    async fn exists(&self, url: &str) -> bool {
        self.existing.contains(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_offline_source_fails_every_request() {
        let source = StaticDataSource::offline();
        assert!(matches!(
            source.creature_rows().await,
            Err(SourceError::Unavailable(_))
        ));
        assert!(source.config_document().await.is_err());
        assert_eq!(source.creature_fetches(), 1);
        assert_eq!(source.config_fetches(), 1);
    }

    #[tokio::test]
    async fn test_dump_source_serves_saved_rows() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SheetDump::CREATURES_FILE), "[[0, 1, \"A\"]]").unwrap();
        std::fs::write(dir.path().join(SheetDump::MOVES_FILE), "[[\"Tackle\"]]").unwrap();
        std::fs::write(
            dir.path().join(SheetDump::CONFIG_FILE),
            r#"{"registered": ["A"]}"#,
        )
        .unwrap();

        let source = StaticDataSource::from_dump(&SheetDump::new(dir.path())).unwrap();
        assert_eq!(source.creature_rows().await.unwrap().len(), 1);
        assert_eq!(source.move_rows().await.unwrap(), vec![json!(["Tackle"])]);
        assert_eq!(
            source.config_document().await.unwrap()["registered"],
            json!(["A"])
        );
    }

    #[test]
    fn test_dump_source_requires_rows() {
        let dir = TempDir::new().unwrap();
        let err = StaticDataSource::from_dump(&SheetDump::new(dir.path()))
            .err()
            .unwrap();
        assert!(matches!(err, SourceError::Dump(_)));
    }

    #[tokio::test]
    async fn test_static_probe_membership() {
        let probe = StaticImageProbe::new(["https://img/001-a.png"]);
        assert!(probe.exists("https://img/001-a.png").await);
        assert!(!probe.exists("https://img/001-a.jpg").await);
    }
}
