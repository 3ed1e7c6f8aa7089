//! FIFO reconciliation of settlement events against liability events
//!
//! A single pass over the ledger keeps one signed running balance: positive
//! while settlements received earlier are still unmatched, negative while a
//! liability awaits settlement. Settlements are drawn from one queue shared by
//! the whole pass, so a payment left over from one bill carries into the next.

pub mod queue;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use queue::{Settlement, SettlementQueue};

use crate::types::*;

/// March 31 closing the April-to-March fiscal year `date` falls in
pub fn fiscal_year_end(date: NaiveDate) -> NaiveDate {
    let march_end = |year| NaiveDate::from_ymd_opt(year, 3, 31).unwrap_or(NaiveDate::MAX);
    let same_year = march_end(date.year());
    if date <= same_year {
        same_year
    } else {
        march_end(date.year() + 1)
    }
}

/// Outcome of applying one ledger row to the running balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Balance after the row
    pub balance: f64,
    /// Records emitted for the row, in order
    pub records: Vec<AllocationRecord>,
}

/// Apply one ledger row to the running balance
///
/// Rows that raise no liability emit a single empty record. A liability is
/// settled from the existing surplus first, then from the queue until the
/// balance is no longer negative. If the queue runs dry first, a final record
/// dated `fallback_date` carries the unsettled amount.
pub fn transition(
    balance: f64,
    row: &LedgerRow,
    queue: &mut SettlementQueue,
    fallback_date: NaiveDate,
) -> Transition {
    let origin = row.origin_index;
    let credit = row.credit;

    if !row.is_liability() {
        return Transition {
            balance,
            records: vec![AllocationRecord::unallocated(origin)],
        };
    }

    if balance - credit >= 0.0 {
        return Transition {
            balance: balance - credit,
            records: vec![AllocationRecord::from_surplus(origin, credit, 0.0)],
        };
    }

    let mut records = Vec::new();
    if balance > 0.0 {
        records.push(AllocationRecord::from_surplus(
            origin,
            balance,
            -(balance - credit).min(0.0),
        ));
    }

    let mut balance = balance - credit;
    while balance < 0.0 {
        let Some(settlement) = queue.next() else {
            break;
        };
        let after = balance + settlement.amount;
        let (allocated, remaining) = if after >= 0.0 {
            (-balance, 0.0)
        } else {
            (settlement.amount, -after)
        };
        records.push(AllocationRecord::settled(
            origin,
            settlement.date,
            settlement.amount,
            allocated,
            remaining,
        ));
        balance = after;
    }

    if balance < 0.0 {
        records.push(AllocationRecord::settled(
            origin,
            fallback_date,
            0.0,
            0.0,
            -balance,
        ));
    }

    Transition { balance, records }
}

/// Single-pass FIFO matcher over a normalized ledger
#[derive(Debug, Clone)]
pub struct ReconciliationEngine {
    queue: SettlementQueue,
    balance: f64,
    fallback_date: NaiveDate,
}

impl ReconciliationEngine {
    /// Prepare a pass over `rows`; `None` when there is nothing to reconcile
    pub fn new(rows: &[LedgerRow]) -> Option<Self> {
        let last = rows.last()?;
        Some(Self {
            queue: SettlementQueue::from_ledger(rows),
            balance: 0.0,
            fallback_date: fiscal_year_end(last.date),
        })
    }

    /// Current running balance
    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Due date used once the queue is exhausted
    pub fn fallback_date(&self) -> NaiveDate {
        self.fallback_date
    }

    /// Settlements not yet drawn
    pub fn pending_settlements(&self) -> usize {
        self.queue.remaining()
    }

    /// Apply the next row in ledger order
    pub fn apply(&mut self, row: &LedgerRow) -> Vec<AllocationRecord> {
        let step = transition(self.balance, row, &mut self.queue, self.fallback_date);
        self.balance = step.balance;
        step.records
    }

    /// Apply every row in order and return all records
    pub fn run(mut self, rows: &[LedgerRow]) -> Vec<AllocationRecord> {
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.extend(self.apply(row));
        }

        debug!(
            rows = rows.len(),
            records = records.len(),
            balance = self.balance,
            unused_settlements = self.queue.remaining(),
            "reconciliation pass complete"
        );

        records
    }
}

/// Reconcile a normalized ledger into allocation records keyed by origin row
pub fn reconcile(rows: &[LedgerRow]) -> Vec<AllocationRecord> {
    match ReconciliationEngine::new(rows) {
        Some(engine) => engine.run(rows),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(index: usize, on: NaiveDate, debit: f64, credit: f64) -> LedgerRow {
        LedgerRow {
            origin_index: index,
            date: on,
            debit,
            credit,
            rate: Some(18.0),
        }
    }

    #[test]
    fn test_fiscal_year_end() {
        assert_eq!(fiscal_year_end(date(2024, 1, 15)), date(2024, 3, 31));
        assert_eq!(fiscal_year_end(date(2024, 3, 31)), date(2024, 3, 31));
        assert_eq!(fiscal_year_end(date(2024, 4, 1)), date(2025, 3, 31));
        assert_eq!(fiscal_year_end(date(2023, 12, 31)), date(2024, 3, 31));
    }

    #[test]
    fn test_single_bill_single_payment() {
        let rows = vec![
            row(0, date(2023, 4, 10), 0.0, 1000.0),
            row(1, date(2023, 11, 15), 1000.0, 0.0),
        ];

        let records = reconcile(&rows);

        assert_eq!(
            records,
            vec![
                AllocationRecord::settled(0, date(2023, 11, 15), 1000.0, 1000.0, 0.0),
                AllocationRecord::unallocated(1),
            ]
        );
    }

    #[test]
    fn test_bill_split_across_payments() {
        let rows = vec![
            row(0, date(2023, 4, 1), 0.0, 1000.0),
            row(1, date(2023, 5, 1), 300.0, 0.0),
            row(2, date(2023, 6, 1), 500.0, 0.0),
            row(3, date(2023, 7, 1), 400.0, 0.0),
        ];

        let records = reconcile(&rows);

        assert_eq!(records.len(), 6);
        assert_eq!(
            records[..3],
            [
                AllocationRecord::settled(0, date(2023, 5, 1), 300.0, 300.0, 700.0),
                AllocationRecord::settled(0, date(2023, 6, 1), 500.0, 500.0, 200.0),
                AllocationRecord::settled(0, date(2023, 7, 1), 400.0, 200.0, 0.0),
            ]
        );
        assert!(records[3..].iter().all(|r| r.allocated_amount.is_none()));
    }

    #[test]
    fn test_surplus_carries_into_next_bill() {
        // The payment overshoots the first bill; the excess settles the later ones
        let rows = vec![
            row(0, date(2023, 4, 1), 0.0, 100.0),
            row(1, date(2023, 4, 2), 0.0, 50.0),
            row(2, date(2023, 5, 1), 250.0, 0.0),
            row(3, date(2023, 6, 1), 0.0, 60.0),
        ];

        let mut engine = ReconciliationEngine::new(&rows).unwrap();

        assert_eq!(
            engine.apply(&rows[0]),
            vec![AllocationRecord::settled(0, date(2023, 5, 1), 250.0, 100.0, 0.0)]
        );
        assert_eq!(engine.balance(), 150.0);

        assert_eq!(
            engine.apply(&rows[1]),
            vec![AllocationRecord::from_surplus(1, 50.0, 0.0)]
        );
        assert_eq!(engine.balance(), 100.0);

        assert_eq!(engine.apply(&rows[2]), vec![AllocationRecord::unallocated(2)]);

        assert_eq!(
            engine.apply(&rows[3]),
            vec![AllocationRecord::from_surplus(3, 60.0, 0.0)]
        );
        assert_eq!(engine.balance(), 40.0);
    }

    #[test]
    fn test_partial_surplus_then_queue() {
        let rows = vec![
            row(0, date(2023, 4, 1), 0.0, 100.0),
            row(1, date(2023, 4, 5), 130.0, 0.0),
            row(2, date(2023, 4, 10), 0.0, 80.0),
            row(3, date(2023, 4, 20), 90.0, 0.0),
        ];

        let records = reconcile(&rows);

        assert_eq!(
            records,
            vec![
                AllocationRecord::settled(0, date(2023, 4, 5), 130.0, 100.0, 0.0),
                AllocationRecord::unallocated(1),
                AllocationRecord::from_surplus(2, 30.0, 50.0),
                AllocationRecord::settled(2, date(2023, 4, 20), 90.0, 50.0, 0.0),
                AllocationRecord::unallocated(3),
            ]
        );
    }

    #[test]
    fn test_exhausted_queue_falls_back_to_fiscal_year_end() {
        let rows = vec![
            row(0, date(2023, 4, 1), 0.0, 1000.0),
            row(1, date(2023, 6, 1), 400.0, 0.0),
            row(2, date(2023, 7, 1), 0.0, 200.0),
        ];

        let records = reconcile(&rows);

        assert_eq!(
            records,
            vec![
                AllocationRecord::settled(0, date(2023, 6, 1), 400.0, 400.0, 600.0),
                AllocationRecord::settled(0, date(2024, 3, 31), 0.0, 0.0, 600.0),
                AllocationRecord::unallocated(1),
                AllocationRecord::settled(2, date(2024, 3, 31), 0.0, 0.0, 800.0),
            ]
        );
    }

    #[test]
    fn test_zero_credit_row_emits_single_empty_record() {
        let rows = vec![row(0, date(2023, 4, 1), 500.0, 0.0)];

        let mut queue = SettlementQueue::from_ledger(&rows);
        let step = transition(0.0, &rows[0], &mut queue, date(2024, 3, 31));

        assert_eq!(step.balance, 0.0);
        assert_eq!(step.records, vec![AllocationRecord::unallocated(0)]);
        // Settlement rows never advance the cursor on their own
        assert_eq!(queue.consumed(), 0);
    }

    #[test]
    fn test_reconcile_empty_ledger() {
        assert!(reconcile(&[]).is_empty());
    }
}
