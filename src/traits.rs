//! Traits for the input and output collaborators of the interest pipeline

use serde::{Deserialize, Serialize};

use crate::config::DELAY_THRESHOLD_DAYS;
use crate::ledger::InterestReport;
use crate::types::*;

/// Source of a raw ledger table
///
/// Implementations read a file, an upload or an in-memory fixture and hand the
/// pipeline a table whose header row may sit below a few rows of noise.
pub trait TableSource {
    /// Read the raw table
    fn read_table(&mut self) -> InterestResult<Table>;
}

/// Consumer of a finished interest report
///
/// Spreadsheet, CSV or screen renderers implement this; `ReportLayout` on the
/// report tells them which columns hold dates, which column gets a total and
/// which cells to highlight.
pub trait ReportRenderer {
    /// Render the report
    fn render(&mut self, report: &InterestReport) -> InterestResult<()>;
}

/// Presentation hints handed to a `ReportRenderer`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLayout {
    /// Columns holding dates
    pub date_columns: Vec<String>,
    /// Column summed in a totals row
    pub total_column: String,
    /// Column whose values are compared against `highlight_above`
    pub highlight_column: String,
    /// Values strictly greater than this are highlighted
    pub highlight_above: i64,
}

impl ReportLayout {
    /// Layout for a report whose ledger date column is labelled `date_column`
    pub fn for_date_column(date_column: &str) -> Self {
        Self {
            date_columns: vec![
                date_column.to_string(),
                crate::ledger::PAYMENT_DATE.to_string(),
                crate::ledger::ITC_DATE.to_string(),
            ],
            total_column: crate::ledger::INTEREST_AMOUNT.to_string(),
            highlight_column: crate::ledger::DELAY_DAYS.to_string(),
            highlight_above: DELAY_THRESHOLD_DAYS,
        }
    }

    /// Whether a value in the highlight column should be highlighted
    pub fn is_highlighted(&self, cell: &Cell) -> bool {
        matches!(cell, Cell::Number(n) if *n > self.highlight_above as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_for_date_column() {
        let layout = ReportLayout::for_date_column("Voucher Date");

        assert_eq!(
            layout.date_columns,
            vec!["Voucher Date", "Payment Date", "Date of ITC availed"]
        );
        assert_eq!(layout.total_column, "Interest Amt @18%");
        assert_eq!(layout.highlight_column, "Payment Delayed by (Days)");
    }

    #[test]
    fn test_highlight_is_strict() {
        let layout = ReportLayout::for_date_column("Date");

        assert!(!layout.is_highlighted(&Cell::Number(180.0)));
        assert!(layout.is_highlighted(&Cell::Number(181.0)));
        assert!(!layout.is_highlighted(&Cell::Empty));
    }
}
