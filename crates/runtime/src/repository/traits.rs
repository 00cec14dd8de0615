//! Storage contract behind the cache.

use crate::repository::Result;

/// Raw key/value storage for serialized cache entries.
///
/// Backends are best effort: entries may be evicted or missing at any time.
pub trait StorageBackend: Send + Sync {
    /// Read the raw value stored under `key`.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
