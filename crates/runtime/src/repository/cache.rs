//! Best-effort key/value cache with per-key freshness stamps.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use strum::IntoEnumIterator;
use tracing::{debug, warn};

use crate::repository::{Clock, InMemoryStorage, StorageBackend, SystemClock};

/// The five logical keys of the persisted state layout.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::AsRefStr, strum::EnumIter,
)]
pub enum CacheKey {
    #[strum(serialize = "dex_creature_data")]
    Creatures,
    #[strum(serialize = "dex_move_data")]
    Moves,
    #[strum(serialize = "dex_config")]
    Config,
    #[strum(serialize = "dex_cache_timestamps")]
    Timestamps,
    #[strum(serialize = "dex_admin_session")]
    AdminSession,
}

type Timestamps = BTreeMap<String, i64>;

/// Facade over a [`StorageBackend`] that never fails.
///
/// Read errors and undecodable entries are misses; write errors are dropped.
/// Both are logged at `warn`.
#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    pub fn new(backend: Arc<dyn StorageBackend>, clock: Arc<dyn Clock>) -> Self {
        Self { backend, clock }
    }

    /// An in-memory cache on the system clock.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStorage::new()), Arc::new(SystemClock))
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    pub fn get<T: DeserializeOwned>(&self, key: CacheKey) -> Option<T> {
        let raw = match self.backend.read(key.as_ref()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!("Failed to read cache entry {}: {}", key.as_ref(), err);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!("Cache hit for {}", key.as_ref());
                Some(value)
            }
            Err(err) => {
                warn!("Discarding corrupt cache entry {}: {}", key.as_ref(), err);
                None
            }
        }
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: CacheKey, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("Failed to serialize cache entry {}: {}", key.as_ref(), err);
                return;
            }
        };

        if let Err(err) = self.backend.write(key.as_ref(), &raw) {
            warn!("Failed to write cache entry {}: {}", key.as_ref(), err);
        }
    }

    pub fn remove(&self, key: CacheKey) {
        if let Err(err) = self.backend.remove(key.as_ref()) {
            warn!("Failed to remove cache entry {}: {}", key.as_ref(), err);
        }
    }

    /// True when `key` was stamped less than `window` ago.
    pub fn is_fresh(&self, key: CacheKey, window: Duration) -> bool {
        let Some(stamp) = self.timestamps().get(key.as_ref()).copied() else {
            return false;
        };
        let window = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);
        self.now_millis().saturating_sub(stamp) < window
    }

    /// Records now as the freshness stamp of `key`.
    pub fn touch(&self, key: CacheKey) {
        let mut stamps = self.timestamps();
        stamps.insert(key.as_ref().to_string(), self.now_millis());
        self.set(CacheKey::Timestamps, &stamps);
    }

    /// Newest freshness stamp over all keys.
    pub fn last_cache_time(&self) -> Option<DateTime<Utc>> {
        self.timestamps()
            .values()
            .max()
            .and_then(|millis| DateTime::from_timestamp_millis(*millis))
    }

    /// Removes every logical key, the admin session included.
    pub fn clear_all(&self) {
        for key in CacheKey::iter() {
            self.remove(key);
        }
        debug!("Cleared all cache entries");
    }

    fn timestamps(&self) -> Timestamps {
        self.get(CacheKey::Timestamps).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{ManualClock, RepositoryError};

    struct BrokenStorage;

    impl StorageBackend for BrokenStorage {
        fn read(&self, _key: &str) -> crate::repository::Result<Option<String>> {
            Err(RepositoryError::LockPoisoned)
        }

        fn write(&self, _key: &str, _value: &str) -> crate::repository::Result<()> {
            Err(RepositoryError::LockPoisoned)
        }

        fn remove(&self, _key: &str) -> crate::repository::Result<()> {
            Err(RepositoryError::LockPoisoned)
        }
    }

    fn store_with_clock() -> (CacheStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let store = CacheStore::new(Arc::new(InMemoryStorage::new()), clock.clone());
        (store, clock)
    }

    #[test]
    fn test_freshness_window_is_strict() {
        let (store, clock) = store_with_clock();
        let window = Duration::from_secs(60);

        assert!(!store.is_fresh(CacheKey::Moves, window));
        store.touch(CacheKey::Moves);
        assert!(store.is_fresh(CacheKey::Moves, window));

        clock.advance(Duration::from_millis(59_999));
        assert!(store.is_fresh(CacheKey::Moves, window));
        clock.advance(Duration::from_millis(1));
        assert!(!store.is_fresh(CacheKey::Moves, window));
    }

    #[test]
    fn test_last_cache_time_is_newest_stamp() {
        let (store, clock) = store_with_clock();
        assert!(store.last_cache_time().is_none());

        store.touch(CacheKey::Creatures);
        clock.advance(Duration::from_secs(5));
        store.touch(CacheKey::Config);

        let newest = store.last_cache_time().unwrap();
        assert_eq!(newest.timestamp_millis(), 1_005_000);
    }

    #[test]
    fn test_clear_all_drops_values_and_stamps() {
        let (store, _) = store_with_clock();
        store.set(CacheKey::Config, &serde_json::json!({ "registered": [] }));
        store.touch(CacheKey::Config);

        store.clear_all();
        assert!(store.get::<serde_json::Value>(CacheKey::Config).is_none());
        assert!(!store.is_fresh(CacheKey::Config, Duration::from_secs(60)));
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let backend = Arc::new(InMemoryStorage::new());
        backend.write("dex_config", "{ nope").unwrap();
        let store = CacheStore::new(backend, Arc::new(SystemClock));
        assert!(store.get::<serde_json::Value>(CacheKey::Config).is_none());
    }

    #[test]
    fn test_broken_backend_degrades_silently() {
        let store = CacheStore::new(Arc::new(BrokenStorage), Arc::new(SystemClock));
        store.set(CacheKey::Moves, &vec![1, 2, 3]);
        store.touch(CacheKey::Moves);
        store.clear_all();
        assert!(store.get::<Vec<u32>>(CacheKey::Moves).is_none());
        assert!(!store.is_fresh(CacheKey::Moves, Duration::from_secs(60)));
    }

    #[test]
    fn test_key_names_match_layout() {
        let names: Vec<String> = CacheKey::iter().map(|key| key.as_ref().to_string()).collect();
        assert_eq!(
            names,
            [
                "dex_creature_data",
                "dex_move_data",
                "dex_config",
                "dex_cache_timestamps",
                "dex_admin_session"
            ]
        );
    }
}
