//! Move row decoding.
//!
//! Columns: name, type, power, time, vp, duration, range, description, higher.

use dex_core::Move;
use serde_json::Value;

use super::{Decoded, RowError, cell};

/// Decoder for the move sheet.
pub struct MoveRows;

impl MoveRows {
    pub fn decode(rows: &[Value]) -> Decoded<Move> {
        let mut decoded = Decoded::default();
        for (index, row) in rows.iter().enumerate() {
            match Self::decode_row(index, row) {
                Ok(Some(record)) => decoded.records.push(record),
                Ok(None) => {}
                Err(err) => decoded.rejected.push(err),
            }
        }
        decoded
    }

    pub fn decode_row(index: usize, row: &Value) -> Result<Option<Move>, RowError> {
        let row = row.as_array().ok_or(RowError::NotAnArray { index })?;
        let Some(name) = cell(row, 0) else {
            return Ok(None);
        };
        let text = |i| cell(row, i).unwrap_or_default();

        Ok(Some(Move {
            name,
            move_type: text(1),
            power: cell(row, 2),
            time: text(3),
            vp: text(4),
            duration: text(5),
            range: text(6),
            description: text(7),
            higher: cell(row, 8),
        }))
    }
}
