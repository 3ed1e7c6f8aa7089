//! FIFO queue of settlement events shared across a reconciliation pass

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::LedgerRow;

/// A dated payment available to settle liabilities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Settlements in ledger order, consumed front to back by a cursor that never rewinds
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettlementQueue {
    entries: Vec<Settlement>,
    cursor: usize,
}

impl SettlementQueue {
    /// Collect every row with a positive settlement amount, in row order
    pub fn from_ledger(rows: &[LedgerRow]) -> Self {
        let entries = rows
            .iter()
            .filter(|row| row.is_settlement())
            .map(|row| Settlement {
                date: row.date,
                amount: row.debit,
            })
            .collect();
        Self { entries, cursor: 0 }
    }

    /// Whether every settlement has been consumed
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.entries.len()
    }

    /// Number of settlements not yet consumed
    pub fn remaining(&self) -> usize {
        self.entries.len() - self.cursor
    }

    /// Number of settlements consumed so far
    pub fn consumed(&self) -> usize {
        self.cursor
    }

    /// Total number of settlements
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Yields the next unconsumed settlement, advancing the cursor
impl Iterator for SettlementQueue {
    type Item = Settlement;

    fn next(&mut self) -> Option<Settlement> {
        let settlement = self.entries.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(settlement)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(index: usize, day: u32, debit: f64, credit: f64) -> LedgerRow {
        LedgerRow {
            origin_index: index,
            date: NaiveDate::from_ymd_opt(2023, 5, day).unwrap(),
            debit,
            credit,
            rate: Some(18.0),
        }
    }

    #[test]
    fn test_queue_takes_positive_debits_in_order() {
        let rows = vec![
            row(0, 1, 0.0, 100.0),
            row(1, 2, 40.0, 0.0),
            row(2, 3, -5.0, 0.0),
            row(3, 4, 60.0, 10.0),
        ];
        let mut queue = SettlementQueue::from_ledger(&rows);

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.next().unwrap().amount, 40.0);
        assert_eq!(queue.remaining(), 1);

        let last = queue.next().unwrap();
        assert_eq!(last.amount, 60.0);
        assert_eq!(last.date, NaiveDate::from_ymd_opt(2023, 5, 4).unwrap());

        assert!(queue.is_exhausted());
        assert_eq!(queue.next(), None);
        assert_eq!(queue.consumed(), 2);
    }

    #[test]
    fn test_queue_resumes_where_it_stopped() {
        let rows = vec![row(0, 1, 10.0, 0.0), row(1, 2, 20.0, 0.0), row(2, 3, 30.0, 0.0)];
        let mut queue = SettlementQueue::from_ledger(&rows);

        let first: Vec<f64> = queue.by_ref().take(1).map(|s| s.amount).collect();
        assert_eq!(first, vec![10.0]);
        assert_eq!(queue.size_hint(), (2, Some(2)));

        let rest: f64 = queue.by_ref().map(|s| s.amount).sum();
        assert_eq!(rest, 50.0);
        assert_eq!(queue.consumed(), 3);
        assert_eq!(queue.next(), None);
    }
}
