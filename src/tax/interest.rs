//! Interest on input tax credit for bills paid beyond 180 days

use chrono::{Datelike, NaiveDate};

use crate::config::{DELAY_THRESHOLD_DAYS, ITC_AVAILMENT_DAY, STATUTORY_INTEREST_RATE};
use crate::tax::gst::{round_currency, tax_portion};
use crate::types::*;

/// The 20th of the month after `date`, when input tax credit is deemed availed
pub fn itc_availment_date(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, ITC_AVAILMENT_DAY).unwrap_or(date)
}

/// Interest accruing on `tax` over `days` at the statutory annual rate
pub fn statutory_interest(tax: f64, days: i64) -> f64 {
    round_currency(tax * (STATUTORY_INTEREST_RATE / 100.0) * days as f64 / 365.0)
}

/// Derive delay and interest for one allocation record
///
/// Records without a settlement date (rows raising no liability, or liability
/// covered by an earlier surplus) carry no derived values. Interest days run
/// from the ITC availment date, and only once the delay exceeds 180 days.
pub fn derive_interest(origin: &LedgerRow, allocation: &AllocationRecord) -> InterestRow {
    let mut row = InterestRow {
        origin: origin.clone(),
        allocation: allocation.clone(),
        delay_days: None,
        itc_date: None,
        tax_portion: None,
        interest_days: None,
        interest_amount: None,
    };

    let Some(settled_on) = allocation.settlement_date else {
        return row;
    };

    let delay_days = (settled_on - origin.date).num_days();
    let itc_date = itc_availment_date(origin.date);
    let interest_days = if delay_days > DELAY_THRESHOLD_DAYS {
        (settled_on - itc_date).num_days()
    } else {
        0
    };
    let tax = match (allocation.allocated_amount, origin.rate) {
        (Some(amount), Some(rate)) => Some(tax_portion(amount, rate)),
        _ => None,
    };

    row.delay_days = Some(delay_days);
    row.itc_date = Some(itc_date);
    row.tax_portion = tax;
    row.interest_days = Some(interest_days);
    row.interest_amount = tax.map(|t| statutory_interest(t, interest_days));
    row
}
