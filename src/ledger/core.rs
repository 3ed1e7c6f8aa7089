//! Main pipeline that turns a raw ledger table into an interest report

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{ColumnBindings, InterestConfig, DELAY_THRESHOLD_DAYS, HEADER_SCAN_LIMIT};
use crate::ledger::header::locate_header;
use crate::ledger::normalizer::{
    normalize, NormalizedLedger, CREDIT_COLUMN, DATE_COLUMN, DEBIT_COLUMN, RATE_COLUMN,
};
use crate::reconciliation::ReconciliationEngine;
use crate::tax::gst::{format_currency, to_currency};
use crate::tax::interest::derive_interest;
use crate::traits::*;
use crate::types::*;

pub const PAYMENT_DATE: &str = "Payment Date";
pub const PAID_TOTAL: &str = "Paid Amt (Total)";
pub const PAID_BILL_WISE: &str = "Paid Amt (Bill-wise)";
pub const BALANCE_PAYABLE: &str = "Balance Payable";
pub const DELAY_DAYS: &str = "Payment Delayed by (Days)";
pub const ITC_DATE: &str = "Date of ITC availed";
pub const GST_AMOUNT: &str = "GST Amt";
pub const INTEREST_DAYS: &str = "Int.Days (Int. for payment made beyond 180days)";
pub const INTEREST_AMOUNT: &str = "Interest Amt @18%";

/// Columns appended after the ledger's own columns, in output order
pub const DERIVED_COLUMNS: [&str; 9] = [
    PAYMENT_DATE,
    PAID_TOTAL,
    PAID_BILL_WISE,
    BALANCE_PAYABLE,
    DELAY_DAYS,
    ITC_DATE,
    GST_AMOUNT,
    INTEREST_DAYS,
    INTEREST_AMOUNT,
];

/// Enriched ledger ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestReport {
    /// Ledger columns under the caller's labels, then the derived columns
    pub table: Table,
    /// Typed rows behind `table`, one per allocation record
    pub rows: Vec<InterestRow>,
    /// Running balance left after the last ledger row
    pub closing_balance: f64,
    /// Presentation hints for the renderer
    pub layout: ReportLayout,
}

impl InterestReport {
    /// Whether no ledger rows survived normalization
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Totals over the report
    pub fn summary(&self) -> InterestSummary {
        let total_interest: BigDecimal = self
            .rows
            .iter()
            .filter_map(|r| r.interest_amount.and_then(to_currency))
            .sum();

        let mut total_liability = 0.0;
        let mut last_origin = None;
        for row in &self.rows {
            if last_origin != Some(row.origin.origin_index) && row.origin.is_liability() {
                total_liability += row.origin.credit;
            }
            last_origin = Some(row.origin.origin_index);
        }

        InterestSummary {
            total_interest: total_interest.with_scale(2),
            total_liability,
            total_allocated: self
                .rows
                .iter()
                .filter_map(|r| r.allocation.allocated_amount)
                .sum(),
            delayed_records: self
                .rows
                .iter()
                .filter(|r| r.delay_days.is_some_and(|d| d > DELAY_THRESHOLD_DAYS))
                .count(),
            unresolved_balance: (-self.closing_balance).max(0.0),
        }
    }
}

/// Totals over an interest report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestSummary {
    /// Sum of the interest column
    pub total_interest: BigDecimal,
    /// Sum of all liabilities raised
    pub total_liability: f64,
    /// Sum of all amounts allocated to liabilities
    pub total_allocated: f64,
    /// Records paid more than 180 days late
    pub delayed_records: usize,
    /// Liability still unsettled after the last row
    pub unresolved_balance: f64,
}

impl InterestSummary {
    /// Total interest as a 2-place currency string
    pub fn total_interest_text(&self) -> String {
        format_currency(&self.total_interest)
    }
}

/// Compute GST interest for a raw ledger table
///
/// Locates the header, normalizes the ledger, reconciles settlements against
/// liabilities and derives interest per allocation. A ledger with no usable
/// rows yields an empty report rather than an error.
pub fn calculate_gst_interest(
    table: &Table,
    config: &InterestConfig,
) -> InterestResult<InterestReport> {
    let bindings = &config.columns;
    bindings.validate()?;

    let located = locate_header(table, &bindings.required(), HEADER_SCAN_LIMIT);
    let ledger = normalize(&located, bindings, config.invalid_dates)?;

    let report = build_report(&ledger, bindings);
    info!(
        ledger_rows = ledger.rows.len(),
        records = report.rows.len(),
        closing_balance = report.closing_balance,
        "computed GST interest"
    );
    Ok(report)
}

/// Read a table from `source`, compute interest and hand the report to `renderer`
///
/// The renderer is skipped when the report is empty.
pub fn process<S, R>(
    source: &mut S,
    renderer: &mut R,
    config: &InterestConfig,
) -> InterestResult<InterestReport>
where
    S: TableSource + ?Sized,
    R: ReportRenderer + ?Sized,
{
    let table = source.read_table()?;
    let report = calculate_gst_interest(&table, config)?;
    if report.is_empty() {
        info!("no ledger rows to compute interest for");
    } else {
        renderer.render(&report)?;
    }
    Ok(report)
}

/// Join reconciled allocations back onto the normalized ledger
pub fn build_report(ledger: &NormalizedLedger, bindings: &ColumnBindings) -> InterestReport {
    let columns: Vec<String> = ledger
        .table
        .columns
        .iter()
        .map(|c| caller_label(c, bindings))
        .chain(DERIVED_COLUMNS.iter().map(|c| c.to_string()))
        .collect();
    let layout = ReportLayout::for_date_column(&bindings.date);

    let Some(mut engine) = ReconciliationEngine::new(&ledger.rows) else {
        return InterestReport {
            table: Table::empty(columns),
            rows: Vec::new(),
            closing_balance: 0.0,
            layout,
        };
    };

    let mut rows = Vec::new();
    let mut cells = Vec::new();
    for origin in &ledger.rows {
        for allocation in engine.apply(origin) {
            let row = derive_interest(origin, &allocation);
            let mut out = ledger.table.rows[origin.origin_index].clone();
            out.extend(derived_cells(&row));
            cells.push(out);
            rows.push(row);
        }
    }

    InterestReport {
        table: Table::new(columns, cells),
        rows,
        closing_balance: engine.balance(),
        layout,
    }
}

fn caller_label(canonical: &str, bindings: &ColumnBindings) -> String {
    match canonical {
        DATE_COLUMN => bindings.date.clone(),
        DEBIT_COLUMN => bindings.debit.clone(),
        CREDIT_COLUMN => bindings.credit.clone(),
        RATE_COLUMN => bindings.rate.clone(),
        other => other.to_string(),
    }
}

fn derived_cells(row: &InterestRow) -> [Cell; 9] {
    let allocation = &row.allocation;
    [
        allocation.settlement_date.into(),
        allocation.settlement_total.into(),
        allocation.allocated_amount.into(),
        allocation.balance_remaining.into(),
        row.delay_days.map(|d| d as f64).into(),
        row.itc_date.into(),
        row.tax_portion.into(),
        row.interest_days.map(|d| d as f64).into(),
        row.interest_amount.into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn raw(rows: &[[&str; 4]]) -> Table {
        Table::new(
            vec!["Date".into(), "Narration".into(), "Debit".into(), "Credit".into()],
            rows.iter()
                .map(|r| r.iter().map(|v| Cell::from(*v)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_calculate_gst_interest_single_bill() {
        let table = raw(&[
            ["2023-04-10 00:00:00", "Bill 17", "", "1000"],
            ["2023-11-15 00:00:00", "NEFT", "1000", ""],
        ]);

        let report = calculate_gst_interest(&table, &InterestConfig::default()).unwrap();

        assert_eq!(report.table.columns.len(), 5 + 9);
        assert_eq!(&report.table.columns[..5], ["Date", "Narration", "Debit", "Credit", "GST%"]);
        assert_eq!(report.table.row_count(), 2);

        let first = &report.table.rows[0];
        assert_eq!(first[0], Cell::Date(date(2023, 4, 10)));
        assert_eq!(first[1], Cell::from("Bill 17"));
        assert_eq!(first[5], Cell::Date(date(2023, 11, 15)));
        assert_eq!(first[7], Cell::Number(1000.0));
        assert_eq!(first[9], Cell::Number(219.0));
        assert_eq!(first[10], Cell::Date(date(2023, 5, 20)));
        assert_eq!(first[12], Cell::Number(179.0));
        assert_eq!(first[13], Cell::Number(13.47));

        let second = &report.table.rows[1];
        assert!(second[5..].iter().all(Cell::is_empty));

        let summary = report.summary();
        assert_eq!(summary.total_interest_text(), "13.47");
        assert_eq!(summary.total_liability, 1000.0);
        assert_eq!(summary.total_allocated, 1000.0);
        assert_eq!(summary.delayed_records, 1);
        assert_eq!(summary.unresolved_balance, 0.0);
    }

    #[test]
    fn test_calculate_gst_interest_empty_ledger() {
        let table = raw(&[["", "Opening", "", ""]]);

        let report = calculate_gst_interest(&table, &InterestConfig::default()).unwrap();

        assert!(report.is_empty());
        assert!(report.table.is_empty());
        assert_eq!(report.table.columns.last().map(String::as_str), Some(INTEREST_AMOUNT));
    }

    #[test]
    fn test_zero_interest_total_keeps_two_places() {
        let table = raw(&[
            ["2023-04-10", "Bill 18", "", "100"],
            ["2023-04-20", "NEFT", "100", ""],
        ]);

        let report = calculate_gst_interest(&table, &InterestConfig::default()).unwrap();

        assert_eq!(report.rows[0].interest_amount, Some(0.0));
        assert_eq!(report.summary().total_interest_text(), "0.00");
    }

    #[test]
    fn test_custom_bindings_are_restored() {
        let table = Table::new(
            vec!["Voucher Date".into(), "Paid".into(), "Billed".into(), "Rate".into()],
            vec![vec![
                Cell::from("2023-04-10"),
                Cell::Empty,
                Cell::Number(105.0),
                Cell::Number(5.0),
            ]],
        );
        let config = InterestConfig::with_columns(ColumnBindings {
            date: "Voucher Date".into(),
            debit: "Paid".into(),
            credit: "Billed".into(),
            rate: "Rate".into(),
        });

        let report = calculate_gst_interest(&table, &config).unwrap();

        assert_eq!(&report.table.columns[..4], ["Voucher Date", "Paid", "Billed", "Rate"]);
        assert_eq!(report.layout.date_columns[0], "Voucher Date");
        // No payments at all: the bill falls back to the fiscal year end
        assert_eq!(report.rows[0].allocation.settlement_date, Some(date(2024, 3, 31)));
        assert_eq!(report.summary().unresolved_balance, 105.0);
    }
}
