//! Positional row decoding.
//!
//! The remote sheet returns every record as a JSON array whose column indices
//! are fixed. Cells may be strings or numbers; blank cells decode as absent.

pub mod creatures;
pub mod moves;

pub use creatures::{CreatureRows, column};
pub use moves::MoveRows;

use serde_json::Value;

/// Why a single row could not be decoded.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RowError {
    #[error("row {index} is not an array")]
    NotAnArray { index: usize },

    #[error("row {index} ({name}): invalid id {value:?}")]
    InvalidId {
        index: usize,
        name: String,
        value: String,
    },

    #[error("row {index} ({name}): missing primary type")]
    MissingPrimaryType { index: usize, name: String },

    #[error("row {index} ({name}): missing primary ability")]
    MissingPrimaryAbility { index: usize, name: String },
}

/// Rows that decoded, plus the rows that were rejected.
#[derive(Debug)]
pub struct Decoded<T> {
    pub records: Vec<T>,
    pub rejected: Vec<RowError>,
}

impl<T> Default for Decoded<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

/// Text of one cell, trimmed. Blank strings and non-scalar values are absent.
pub(crate) fn cell(row: &[Value], index: usize) -> Option<String> {
    match row.get(index)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(number_text(n)),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Integral floats print without a fractional part, matching how the sheet shows them.
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}
