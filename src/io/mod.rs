//! File I/O collaborators: delimited ledger import and report export

pub mod csv;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::traits::TableSource;
use crate::types::*;

pub use self::csv::{CsvReportWriter, CsvTableSource};

/// Ledger file formats the crate can read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputFormat {
    Csv,
    Tsv,
}

/// Determine the input format from the file extension
///
/// Spreadsheet workbooks and anything else are rejected with
/// `InterestError::UnsupportedFormat`, which callers surface as a warning
/// without running the computation.
pub fn detect_format(path: &Path) -> InterestResult<InputFormat> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("csv") | Some("txt") => Ok(InputFormat::Csv),
        Some("tsv") | Some("tab") => Ok(InputFormat::Tsv),
        _ => Err(InterestError::UnsupportedFormat(format!(
            "{}: only csv/tsv files are supported",
            path.display()
        ))),
    }
}

/// Open a table source for `path` after checking its format
pub fn open_table(path: &Path) -> InterestResult<Box<dyn TableSource>> {
    let source = match detect_format(path)? {
        InputFormat::Csv => CsvTableSource::new(path),
        InputFormat::Tsv => CsvTableSource::with_delimiter(path, b'\t'),
    };
    Ok(Box::new(source))
}
