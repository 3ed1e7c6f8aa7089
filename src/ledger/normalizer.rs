//! Ledger normalization: canonical columns, typed amounts and dates

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{ColumnBindings, InvalidDatePolicy, DEFAULT_GST_RATE};
use crate::types::*;
use crate::utils::validation::{parse_amount, parse_date, parse_optional_amount};

/// Canonical label of the date column
pub const DATE_COLUMN: &str = "date";
/// Canonical label of the settlement column
pub const DEBIT_COLUMN: &str = "debit";
/// Canonical label of the liability column
pub const CREDIT_COLUMN: &str = "credit";
/// Canonical label of the GST rate column
pub const RATE_COLUMN: &str = "rate";

/// Ledger ready for reconciliation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLedger {
    /// Typed rows, `origin_index` matching their position
    pub rows: Vec<LedgerRow>,
    /// Surviving source rows under canonical column labels
    pub table: Table,
}

impl NormalizedLedger {
    /// Whether normalization left no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Date of the last row, used for the fiscal-year fallback
    pub fn last_date(&self) -> Option<chrono::NaiveDate> {
        self.rows.last().map(|r| r.date)
    }
}

/// Standardize a located ledger table into typed rows
///
/// Steps: inject the default rate when the rate column is absent, rename the
/// bound columns to `date`/`debit`/`credit`/`rate`, treat empty amounts as 0,
/// drop rows without a date, parse dates, drop rows dated before the first
/// row, and cast amounts to floating point. Amount signs are not checked.
pub fn normalize(
    table: &Table,
    bindings: &ColumnBindings,
    policy: InvalidDatePolicy,
) -> InterestResult<NormalizedLedger> {
    let mut table = table.clone();

    if table.column_index(&bindings.rate).is_none() {
        debug!(column = %bindings.rate, rate = DEFAULT_GST_RATE, "injecting default GST rate");
        table.columns.push(bindings.rate.clone());
        let width = table.columns.len();
        for row in &mut table.rows {
            row.resize(width - 1, Cell::Empty);
            row.push(Cell::Number(DEFAULT_GST_RATE));
        }
    }

    let date_col = rename_column(&mut table, &bindings.date, DATE_COLUMN)?;
    let debit_col = rename_column(&mut table, &bindings.debit, DEBIT_COLUMN)?;
    let credit_col = rename_column(&mut table, &bindings.credit, CREDIT_COLUMN)?;
    let rate_col = rename_column(&mut table, &bindings.rate, RATE_COLUMN)?;

    let total = table.row_count();
    let mut candidates = Vec::with_capacity(total);
    for source_row in 0..total {
        let date_cell = table.cell(source_row, date_col);
        if date_cell.is_empty() {
            continue;
        }
        match parse_date(date_cell) {
            Some(date) => candidates.push((source_row, date)),
            None => match policy {
                InvalidDatePolicy::Drop => {
                    warn!(
                        row = source_row,
                        value = %date_cell,
                        "dropping row with unparseable date"
                    );
                }
                InvalidDatePolicy::Reject => {
                    return Err(InterestError::InvalidDate {
                        row: source_row,
                        value: date_cell.to_string(),
                    });
                }
            },
        }
    }

    // Rows dated before the first row are footer noise in an ascending ledger
    let start = candidates.first().map(|(_, date)| *date);
    candidates.retain(|(_, date)| Some(*date) >= start);

    let mut rows = Vec::with_capacity(candidates.len());
    let mut kept = Vec::with_capacity(candidates.len());
    for (source_row, date) in candidates {
        let cell = |col| table.cell(source_row, col);
        let debit = parse_amount(cell(debit_col), &bindings.debit, source_row)?;
        let credit = parse_amount(cell(credit_col), &bindings.credit, source_row)?;
        let rate = parse_optional_amount(cell(rate_col), &bindings.rate, source_row)?;

        let mut cells = table.rows[source_row].clone();
        cells.resize(table.columns.len(), Cell::Empty);
        cells[date_col] = Cell::Date(date);
        cells[debit_col] = Cell::Number(debit);
        cells[credit_col] = Cell::Number(credit);

        rows.push(LedgerRow {
            origin_index: rows.len(),
            date,
            debit,
            credit,
            rate,
        });
        kept.push(cells);
    }

    debug!(input = total, kept = rows.len(), "normalized ledger");

    Ok(NormalizedLedger {
        rows,
        table: Table::new(table.columns, kept),
    })
}

fn rename_column(table: &mut Table, from: &str, to: &str) -> InterestResult<usize> {
    let col = table
        .column_index(from)
        .ok_or_else(|| InterestError::MissingColumn(from.to_string()))?;
    table.columns[col] = to.to_string();
    Ok(col)
}
