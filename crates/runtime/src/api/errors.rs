//! Unified error types surfaced by the runtime API.
//!
//! Only fatal load failures, rejected imports and authentication problems
//! reach callers. Config fetch and cache failures are absorbed and logged.
use std::fmt;

use thiserror::Error;

use dex_content::ImportError;

use crate::source::SourceError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to load {dataset} data")]
    Load {
        dataset: Dataset,
        #[source]
        source: SourceError,
    },

    #[error("config import rejected")]
    Import(#[from] ImportError),

    #[error("invalid admin secret")]
    InvalidSecret,

    #[error("admin session required")]
    NotAuthenticated,

    #[error("unknown creature {0:?}")]
    UnknownCreature(String),

    #[error("creature {0:?} is not registered")]
    NotRegistered(String),

    #[error("failed to export config")]
    Export(#[source] serde_json::Error),
}

/// The two sheet datasets whose loss aborts a load.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Dataset {
    Creatures,
    Moves,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Dataset::Creatures => "creature",
            Dataset::Moves => "move",
        };
        write!(f, "{}", label)
    }
}
