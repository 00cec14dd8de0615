//! Remote collaborators: the sheet endpoints, the config document and the
//! image existence probe.
//!
//! The runtime only depends on the traits here. [`HttpDataSource`] and
//! [`HttpImageProbe`] talk to the real endpoints; [`StaticDataSource`] and
//! [`StaticImageProbe`] serve fixed data for offline use and tests.

mod fixed;
mod http;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use fixed::{StaticDataSource, StaticImageProbe};
pub use http::{HttpDataSource, HttpImageProbe};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("expected a JSON array of rows from {0}")]
    NotRows(String),

    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read sheet dump: {0}")]
    Dump(String),
}

pub type Result<T> = std::result::Result<T, SourceError>;

/// Provider of raw sheet rows and the remote configuration document.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Positional creature rows.
    async fn creature_rows(&self) -> Result<Vec<Value>>;

    /// Positional move rows.
    async fn move_rows(&self) -> Result<Vec<Value>>;

    /// The published visibility configuration, as a raw document.
    async fn config_document(&self) -> Result<Value>;
}

/// Existence check for a candidate image URL.
///
/// Failures of any kind count as "does not exist".
#[async_trait]
pub trait ImageProbe: Send + Sync {
    async fn exists(&self, url: &str) -> bool;
}
