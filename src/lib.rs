//! # GST Interest
//!
//! Reconciles a supplier ledger of bills and payments and computes the
//! interest owed on input tax credit when a bill is paid more than 180 days
//! after it was raised.
//!
//! ## Features
//!
//! - **Header location**: finds the real header row below letterhead noise
//! - **Normalization**: canonical columns, default 18% GST rate, typed dates and amounts
//! - **FIFO reconciliation**: payments settle bills oldest first against one running balance
//! - **Interest**: delay, ITC availment date, embedded GST and 18% p.a. interest per allocation
//! - **Collaborator traits**: plug in any table source and report renderer
//!
//! ## Quick Start
//!
//! ```rust
//! use gst_interest::{calculate_gst_interest, Cell, InterestConfig, Table};
//!
//! let table = Table::new(
//!     vec!["Date".into(), "Debit".into(), "Credit".into()],
//!     vec![
//!         vec![Cell::from("2023-04-10"), Cell::Empty, Cell::Number(1000.0)],
//!         vec![Cell::from("2023-11-15"), Cell::Number(1000.0), Cell::Empty],
//!     ],
//! );
//!
//! let report = calculate_gst_interest(&table, &InterestConfig::default()).unwrap();
//! assert_eq!(report.rows[0].interest_amount, Some(13.47));
//! ```

pub mod config;
pub mod io;
pub mod ledger;
pub mod reconciliation;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use ledger::*;
pub use reconciliation::{fiscal_year_end, reconcile, transition, ReconciliationEngine};
pub use tax::*;
pub use traits::*;
pub use types::*;
