//! Walk through FIFO reconciliation of a small in-memory ledger

use chrono::NaiveDate;
use gst_interest::{derive_interest, LedgerRow, ReconciliationEngine};

fn row(origin_index: usize, date: &str, debit: f64, credit: f64) -> chrono::ParseResult<LedgerRow> {
    Ok(LedgerRow {
        origin_index,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d")?,
        debit,
        credit,
        rate: Some(18.0),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let ledger = vec![
        row(0, "2023-04-10", 0.0, 1180.0)?,
        row(1, "2023-05-02", 0.0, 2360.0)?,
        row(2, "2023-06-15", 500.0, 0.0)?,
        row(3, "2023-12-01", 2000.0, 0.0)?,
        row(4, "2024-01-20", 0.0, 590.0)?,
    ];

    let Some(mut engine) = ReconciliationEngine::new(&ledger) else {
        return Ok(());
    };

    println!("Fallback due date: {}\n", engine.fallback_date());

    for entry in &ledger {
        let opening = engine.balance();
        let records = engine.apply(entry);
        println!(
            "Row {} on {}: debit {:.2}, credit {:.2} (balance {:.2} -> {:.2})",
            entry.origin_index,
            entry.date,
            entry.debit,
            entry.credit,
            opening,
            engine.balance()
        );

        for record in records {
            let interest = derive_interest(entry, &record);
            let settled_on = record
                .settlement_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            let delay = interest.delay_days.map(|d| d.to_string()).unwrap_or_default();
            println!(
                "    settled on {settled_on:<10}  allocated {:>8.2}  remaining {:>8.2}  \
                 delay {delay:>4}  interest {:>6.2}",
                record.allocated_amount.unwrap_or_default(),
                record.balance_remaining.unwrap_or_default(),
                interest.interest_amount.unwrap_or_default(),
            );
        }
    }

    println!(
        "\nClosing balance {:.2} with {} settlements unused",
        engine.balance(),
        engine.pending_settlements()
    );
    Ok(())
}
