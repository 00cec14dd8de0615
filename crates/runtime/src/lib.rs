//! Runtime for the creature compendium.
//!
//! Loads creature and move sheets plus the visibility config through a
//! best-effort local cache, resolves what each registered creature exposes,
//! and funnels every admin edit through one update-and-persist path. Consumers
//! drive everything through [`Dex`].
//!
//! Modules are organized by responsibility:
//! - [`dex`] hosts the session and its builder
//! - [`api`] exposes the error types downstream clients handle
//! - [`source`] and [`repository`] adapt the network and local storage
//! - [`fetch`] applies the cache policy of each dataset
//! - [`search`] and [`view`] answer reader queries
//! - [`admin`] gates and applies config edits
pub mod admin;
pub mod api;
pub mod config;
pub mod dex;
pub mod fetch;
pub mod repository;
pub mod search;
pub mod source;
pub mod view;

#[cfg(test)]
mod testing;

pub use admin::{
    AdminGate, AdminSession, MoveEditEntry, Mutation, Outcome, RegistrationStats,
    SearchableMoveEntry,
};
pub use api::{Dataset, Result, RuntimeError};
pub use config::RuntimeConfig;
pub use dex::{Dex, DexBuilder};
pub use fetch::Fetcher;
pub use repository::{
    CacheKey, CacheStore, Clock, FileStorage, InMemoryStorage, ManualClock, RepositoryError,
    StorageBackend, SystemClock,
};
pub use search::{
    FacetFilters, Facets, MOVE_RESULT_LIMIT, MoveSearch, PAGE_SIZE, SearchQuery, SearchResults,
    parse_level,
};
pub use source::{
    DataSource, HttpDataSource, HttpImageProbe, ImageProbe, SourceError, StaticDataSource,
    StaticImageProbe,
};
pub use view::CardView;
