//! Repository layer for locally persisted session data.
//!
//! Everything stored here is a cache: creature and move snapshots, the
//! visibility configuration, freshness stamps and the admin session marker.
//! Backends may lose entries at any time; [`CacheStore`] turns every backend
//! failure into a logged miss.

mod cache;
mod clock;
mod error;
mod file;
mod memory;
mod traits;

pub use cache::{CacheKey, CacheStore};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{RepositoryError, Result};
pub use file::FileStorage;
pub use memory::InMemoryStorage;
pub use traits::StorageBackend;
