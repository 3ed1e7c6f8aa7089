//! Core types and data structures for the interest computation

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single value in a raw table handed over by the file-reading collaborator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Missing value
    #[default]
    Empty,
    /// Free text, including dates and amounts that still need parsing
    Text(String),
    /// Numeric value
    Number(f64),
    /// Calendar date
    Date(NaiveDate),
    /// Date with a time component
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Whether this cell holds no value
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Text used when this cell serves as a column label
    pub fn label(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.trim().to_string()),
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Cell::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Date(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Empty)
    }
}

static EMPTY_CELL: Cell = Cell::Empty;

/// Column-labelled table of raw cells
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    /// Column labels, in display order
    pub columns: Vec<String>,
    /// Data rows; a row shorter than `columns` is padded with `Cell::Empty`
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create a new table
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    /// Create a table with the given columns and no rows
    pub fn empty(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by label
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    /// Cell at the given position, `Cell::Empty` when out of range
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// All values of a column, padded to the row count
    pub fn column(&self, label: &str) -> Option<Vec<&Cell>> {
        let col = self.column_index(label)?;
        Some((0..self.rows.len()).map(|r| self.cell(r, col)).collect())
    }
}

/// A normalized ledger row the reconciliation engine operates on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// Position of this row in the normalized ledger
    pub origin_index: usize,
    /// Date of the event
    pub date: NaiveDate,
    /// Settlement (payment) amount
    pub debit: f64,
    /// Liability (bill) amount
    pub credit: f64,
    /// GST rate percentage; `None` when the cell was empty
    pub rate: Option<f64>,
}

impl LedgerRow {
    /// Whether this row raises a liability
    pub fn is_liability(&self) -> bool {
        self.credit > 0.0
    }

    /// Whether this row records a settlement
    pub fn is_settlement(&self) -> bool {
        self.debit > 0.0
    }
}

/// One partial settlement of a liability, keyed back to its origin row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRecord {
    /// Index of the ledger row this record belongs to
    pub origin_index: usize,
    /// Date of the settlement applied; `None` for surplus consumption
    pub settlement_date: Option<NaiveDate>,
    /// Full amount of the settlement event applied
    pub settlement_total: Option<f64>,
    /// Portion of the liability settled by this record
    pub allocated_amount: Option<f64>,
    /// Liability amount still unsettled after this record
    pub balance_remaining: Option<f64>,
}

impl AllocationRecord {
    /// Record for a row that raises no liability
    pub fn unallocated(origin_index: usize) -> Self {
        Self {
            origin_index,
            settlement_date: None,
            settlement_total: None,
            allocated_amount: None,
            balance_remaining: None,
        }
    }

    /// Record for a liability portion covered by an earlier surplus
    pub fn from_surplus(origin_index: usize, allocated: f64, remaining: f64) -> Self {
        Self {
            origin_index,
            settlement_date: None,
            settlement_total: None,
            allocated_amount: Some(allocated),
            balance_remaining: Some(remaining),
        }
    }

    /// Record for a liability portion covered by a dated settlement
    pub fn settled(
        origin_index: usize,
        date: NaiveDate,
        total: f64,
        allocated: f64,
        remaining: f64,
    ) -> Self {
        Self {
            origin_index,
            settlement_date: Some(date),
            settlement_total: Some(total),
            allocated_amount: Some(allocated),
            balance_remaining: Some(remaining),
        }
    }
}

/// Allocation record joined to its origin row with the derived interest fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestRow {
    /// The ledger row this record originates from
    pub origin: LedgerRow,
    /// The allocation produced by reconciliation
    pub allocation: AllocationRecord,
    /// Days between the liability and the settlement
    pub delay_days: Option<i64>,
    /// Date input tax credit is deemed availed
    pub itc_date: Option<NaiveDate>,
    /// Tax embedded in the allocated amount
    pub tax_portion: Option<f64>,
    /// Days interest accrues for
    pub interest_days: Option<i64>,
    /// Interest owed, rounded to 2 places
    pub interest_amount: Option<f64>,
}

/// Errors that can occur while computing interest
#[derive(Debug, thiserror::Error)]
pub enum InterestError {
    #[error("Missing column: {0}")]
    MissingColumn(String),
    #[error("Invalid date in row {row}: '{value}'")]
    InvalidDate { row: usize, value: String },
    #[error("Invalid amount in column '{column}', row {row}: '{value}'")]
    InvalidAmount {
        column: String,
        row: usize,
        value: String,
    },
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for interest operations
pub type InterestResult<T> = Result<T, InterestError>;
