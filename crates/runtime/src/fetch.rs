//! Fetchers for the three remote datasets.
//!
//! Creatures and moves are served from the cache while it is fresh and
//! non-empty; otherwise they are fetched, decoded and re-cached. A failed
//! fetch is fatal. The config always tries the remote first, then the cache,
//! then the built-in defaults, and re-persists whichever it ends up with.

use std::sync::Arc;
use std::time::Duration;

use dex_content::{CreatureRows, Decoded, MoveRows, image_candidates, ingest};
use dex_core::{Creature, Move, VisibilityConfig};
use serde_json::Value;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::api::{Dataset, Result, RuntimeError};
use crate::repository::{CacheKey, CacheStore};
use crate::source::{DataSource, ImageProbe};

/// Loads datasets through the cache.
#[derive(Clone)]
pub struct Fetcher {
    source: Arc<dyn DataSource>,
    probe: Arc<dyn ImageProbe>,
    cache: CacheStore,
    image_base_url: String,
    data_ttl: Duration,
}

impl Fetcher {
    pub fn new(
        source: Arc<dyn DataSource>,
        probe: Arc<dyn ImageProbe>,
        cache: CacheStore,
        image_base_url: impl Into<String>,
        data_ttl: Duration,
    ) -> Self {
        Self {
            source,
            probe,
            cache,
            image_base_url: image_base_url.into(),
            data_ttl,
        }
    }

    pub async fn fetch_creatures(&self) -> Result<Vec<Creature>> {
        if let Some(cached) = self.fresh::<Creature>(CacheKey::Creatures) {
            info!("Using cached creature data ({} records)", cached.len());
            return Ok(cached);
        }

        info!("Fetching fresh creature data");
        let rows = self
            .source
            .creature_rows()
            .await
            .map_err(|source| RuntimeError::Load {
                dataset: Dataset::Creatures,
                source,
            })?;

        let creatures = report_rejects(Dataset::Creatures, CreatureRows::decode(&rows));
        let creatures =
            resolve_images(creatures, Arc::clone(&self.probe), &self.image_base_url).await;

        self.cache.set(CacheKey::Creatures, &creatures);
        self.cache.touch(CacheKey::Creatures);
        Ok(creatures)
    }

    pub async fn fetch_moves(&self) -> Result<Vec<Move>> {
        if let Some(cached) = self.fresh::<Move>(CacheKey::Moves) {
            info!("Using cached move data ({} records)", cached.len());
            return Ok(cached);
        }

        info!("Fetching fresh move data");
        let rows = self
            .source
            .move_rows()
            .await
            .map_err(|source| RuntimeError::Load {
                dataset: Dataset::Moves,
                source,
            })?;

        let moves = report_rejects(Dataset::Moves, MoveRows::decode(&rows));

        self.cache.set(CacheKey::Moves, &moves);
        self.cache.touch(CacheKey::Moves);
        Ok(moves)
    }

    /// Remote config, else cached config, else defaults. Never fails.
    pub async fn fetch_config(&self) -> VisibilityConfig {
        let config = match self.remote_config().await {
            Some(config) => {
                info!("Loaded config from remote");
                config
            }
            None => match self.cached_config() {
                Some(config) => {
                    info!("Using cached config");
                    config
                }
                None => {
                    info!("Using default config");
                    VisibilityConfig::default()
                }
            },
        };

        self.cache.set(CacheKey::Config, &config);
        self.cache.touch(CacheKey::Config);
        config
    }

    async fn remote_config(&self) -> Option<VisibilityConfig> {
        let document = match self.source.config_document().await {
            Ok(document) => document,
            Err(err) => {
                warn!("Could not fetch remote config: {}", err);
                return None;
            }
        };

        ingest(document)
            .inspect_err(|err| warn!("Ignoring malformed remote config: {}", err))
            .ok()
    }

    fn cached_config(&self) -> Option<VisibilityConfig> {
        let document = self.cache.get::<Value>(CacheKey::Config)?;
        ingest(document)
            .inspect_err(|err| warn!("Ignoring malformed cached config: {}", err))
            .ok()
    }

    fn fresh<T: serde::de::DeserializeOwned>(&self, key: CacheKey) -> Option<Vec<T>> {
        if !self.cache.is_fresh(key, self.data_ttl) {
            return None;
        }
        self.cache
            .get::<Vec<T>>(key)
            .filter(|records| !records.is_empty())
    }
}

fn report_rejects<T>(dataset: Dataset, decoded: Decoded<T>) -> Vec<T> {
    for rejected in &decoded.rejected {
        warn!("Skipping {} row: {}", dataset, rejected);
    }
    debug!(
        "Decoded {} {} rows ({} rejected)",
        decoded.records.len(),
        dataset,
        decoded.rejected.len()
    );
    decoded.records
}

/// Probes every creature's candidate images concurrently.
///
/// Each creature waits for all of its own probes and takes the first existing
/// candidate in extension order. Creatures are probed independently of each
/// other; the output keeps the input order.
pub async fn resolve_images(
    mut creatures: Vec<Creature>,
    probe: Arc<dyn ImageProbe>,
    base_url: &str,
) -> Vec<Creature> {
    let mut tasks = JoinSet::new();
    for (index, creature) in creatures.iter().enumerate() {
        let candidates = image_candidates(base_url, creature);
        let probe = Arc::clone(&probe);
        tasks.spawn(async move { (index, first_existing(candidates, probe).await) });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, image)) => creatures[index].image = image,
            Err(err) => warn!("Image probe task failed: {}", err),
        }
    }
    creatures
}

async fn first_existing(candidates: Vec<String>, probe: Arc<dyn ImageProbe>) -> Option<String> {
    let mut found = vec![false; candidates.len()];
    let mut probes = JoinSet::new();
    for (rank, url) in candidates.iter().cloned().enumerate() {
        let probe = Arc::clone(&probe);
        probes.spawn(async move { (rank, probe.exists(&url).await) });
    }

    while let Some(joined) = probes.join_next().await {
        match joined {
            Ok((rank, exists)) => found[rank] = exists,
            Err(err) => warn!("Image probe task failed: {}", err),
        }
    }

    candidates
        .into_iter()
        .zip(found)
        .find_map(|(url, exists)| exists.then_some(url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticImageProbe;
    use dex_content::decode::column;
    use serde_json::json;

    fn creature(id: u32, name: &str) -> Creature {
        let mut row = vec![json!(""); 80];
        row[column::ID] = json!(id);
        row[column::NAME] = json!(name);
        row[column::PRIMARY_TYPE] = json!("Fire");
        row[column::PRIMARY_ABILITY] = json!("Blaze");
        CreatureRows::decode_row(0, &json!(row)).unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_first_extension_in_priority_order_wins() {
        let probe = StaticImageProbe::new([
            "https://img/004-emberfox.jfif",
            "https://img/004-emberfox.jpg",
        ]);
        let creatures = resolve_images(
            vec![creature(4, "Emberfox"), creature(5, "Nobody")],
            Arc::new(probe),
            "https://img/",
        )
        .await;

        assert_eq!(
            creatures[0].image.as_deref(),
            Some("https://img/004-emberfox.jpg")
        );
        assert_eq!(creatures[1].name, "Nobody");
        assert!(creatures[1].image.is_none());
    }
}
