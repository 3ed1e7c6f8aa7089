//! Column bindings and engine constants

use serde::{Deserialize, Serialize};

use crate::types::{InterestError, InterestResult};

/// Number of leading rows searched for the header row
pub const HEADER_SCAN_LIMIT: usize = 30;

/// GST rate assumed for every bill when the ledger has no rate column
pub const DEFAULT_GST_RATE: f64 = 18.0;

/// Statutory interest rate, percent per annum
pub const STATUTORY_INTEREST_RATE: f64 = 18.0;

/// Payment delay beyond which interest accrues
pub const DELAY_THRESHOLD_DAYS: i64 = 180;

/// Day of the following month on which input tax credit is deemed availed
pub const ITC_AVAILMENT_DAY: u32 = 20;

/// Caller-facing labels of the ledger columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnBindings {
    pub date: String,
    /// Settlement (payment) column
    pub debit: String,
    /// Liability (bill) column
    pub credit: String,
    /// GST rate column; injected with the default rate when absent
    pub rate: String,
}

impl Default for ColumnBindings {
    fn default() -> Self {
        Self {
            date: "Date".to_string(),
            debit: "Debit".to_string(),
            credit: "Credit".to_string(),
            rate: "GST%".to_string(),
        }
    }
}

impl ColumnBindings {
    /// Labels that must appear in the header row
    pub fn required(&self) -> [&str; 3] {
        [self.date.as_str(), self.debit.as_str(), self.credit.as_str()]
    }

    /// Reject bindings that would collapse two columns into one
    pub fn validate(&self) -> InterestResult<()> {
        let labels = [&self.date, &self.debit, &self.credit, &self.rate];
        for (i, label) in labels.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(InterestError::Config(
                    "Column labels cannot be empty".to_string(),
                ));
            }
            if labels[..i].contains(label) {
                return Err(InterestError::Config(format!(
                    "Column label '{label}' is bound more than once"
                )));
            }
        }
        Ok(())
    }
}

/// What to do with a row whose date text fails to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidDatePolicy {
    /// Drop the row and log a warning
    #[default]
    Drop,
    /// Abort with `InterestError::InvalidDate`
    Reject,
}

/// Configuration for one interest computation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InterestConfig {
    pub columns: ColumnBindings,
    pub invalid_dates: InvalidDatePolicy,
}

impl InterestConfig {
    /// Parse and validate a TOML configuration
    pub fn from_toml(input: &str) -> InterestResult<Self> {
        let config: Self =
            toml::from_str(input).map_err(|e| InterestError::Config(e.to_string()))?;
        config.columns.validate()?;
        Ok(config)
    }

    /// Configuration with custom column labels
    pub fn with_columns(columns: ColumnBindings) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }
}
