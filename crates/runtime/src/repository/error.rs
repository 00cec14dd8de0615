//! Error types raised by storage backends.

use thiserror::Error;

/// Errors surfaced by storage backends.
///
/// These never cross the [`crate::repository::CacheStore`] boundary; the cache
/// logs them and degrades to a miss or a no-op.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("storage lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage quota exceeded writing {key}: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
