//! Cell parsing and validation utilities

use chrono::{NaiveDate, NaiveDateTime};

use crate::types::*;

/// Date-time format ledger exports write dates in
pub const LEDGER_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date-only fallback format
pub const LEDGER_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date cell, returning `None` for anything that is not a valid date
pub fn parse_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(d) => Some(*d),
        Cell::DateTime(dt) => Some(dt.date()),
        Cell::Text(s) => parse_date_text(s),
        Cell::Empty | Cell::Number(_) => None,
    }
}

/// Parse date text non-strictly
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, LEDGER_DATETIME_FORMAT)
        .map(|dt| dt.date())
        .or_else(|_| NaiveDate::parse_from_str(text, LEDGER_DATE_FORMAT))
        .ok()
}

/// Parse an amount cell; empty cells count as zero
pub fn parse_amount(cell: &Cell, column: &str, row: usize) -> InterestResult<f64> {
    parse_optional_amount(cell, column, row).map(|v| v.unwrap_or(0.0))
}

/// Parse an amount cell, keeping empty cells as `None`
pub fn parse_optional_amount(
    cell: &Cell,
    column: &str,
    row: usize,
) -> InterestResult<Option<f64>> {
    let invalid = || InterestError::InvalidAmount {
        column: column.to_string(),
        row,
        value: cell.to_string(),
    };

    match cell {
        Cell::Empty => Ok(None),
        Cell::Number(n) if n.is_finite() => Ok(Some(*n)),
        Cell::Text(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            if cleaned.is_empty() {
                return Ok(None);
            }
            match cleaned.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Some(v)),
                _ => Err(invalid()),
            }
        }
        _ => Err(invalid()),
    }
}
