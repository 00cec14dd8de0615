//! Decoding of the remote compendium sheet into domain records.
//!
//! - Creature and move rows are positional JSON arrays ([`decode`]).
//! - Configuration documents are completed once at ingestion ([`config`]).
//! - Image locations are derived from id and name ([`images`]).
//!
//! With the `loaders` feature, saved sheet dumps can be read from disk.

pub mod config;
pub mod decode;
pub mod images;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use config::{ImportError, import, ingest};
pub use decode::{CreatureRows, Decoded, MoveRows, RowError};
pub use images::{IMAGE_EXTENSIONS, image_candidates};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, LoadResult, RowsLoader, SheetDump};
