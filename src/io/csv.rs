// CSV/TSV ledger import and report export

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::ledger::InterestReport;
use crate::traits::*;
use crate::types::*;

/// Display format for date cells in rendered reports
pub const REPORT_DATE_FORMAT: &str = "%d-%b-%y";

/// Reads a delimited ledger file; the first line becomes the column labels
#[derive(Debug, Clone)]
pub struct CsvTableSource {
    path: PathBuf,
    delimiter: Option<u8>,
}

impl CsvTableSource {
    /// Source that sniffs the delimiter from the file contents
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: None,
        }
    }

    /// Source with a fixed delimiter
    pub fn with_delimiter(path: impl Into<PathBuf>, delimiter: u8) -> Self {
        Self {
            path: path.into(),
            delimiter: Some(delimiter),
        }
    }
}

impl TableSource for CsvTableSource {
    fn read_table(&mut self) -> InterestResult<Table> {
        let content = std::fs::read_to_string(&self.path)?;
        let delimiter = self.delimiter.unwrap_or_else(|| sniff_delimiter(&content));
        debug!(path = %self.path.display(), delimiter = %(delimiter as char), "reading ledger");
        parse_table(&content, delimiter)
    }
}

/// Parse delimited text into a table
pub fn parse_table(content: &str, delimiter: u8) -> InterestResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let columns: Vec<String> = match records.next() {
        Some(header) => header?.iter().map(|h| h.trim().to_string()).collect(),
        None => return Ok(Table::default()),
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        rows.push(record.iter().map(Cell::from).collect());
    }

    Ok(Table::new(columns, rows))
}

/// Lines inspected when guessing the delimiter
const SNIFF_LINES: usize = 10;

/// Guess the field delimiter of a ledger export
///
/// Ledger exports often open with single-cell title lines, so each candidate
/// is scored by how many sampled lines it splits into more than one field.
/// Ties go to the earlier candidate; comma when nothing splits.
fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content.lines().take(SNIFF_LINES).collect();

    [b',', b'\t', b';', b'|']
        .into_iter()
        .rev()
        .map(|delimiter| {
            let hits = sample
                .iter()
                .filter(|line| field_count(line, delimiter) > 1)
                .count();
            (delimiter, hits)
        })
        .filter(|&(_, hits)| hits > 0)
        .max_by_key(|&(_, hits)| hits)
        .map_or(b',', |(delimiter, _)| delimiter)
}

fn field_count(line: &str, delimiter: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(Result::ok)
        .map_or(1, |record| record.len())
}

/// Writes interest reports as CSV with a trailing totals row
///
/// Dates in the layout's date columns are written as `dd-Mon-yy`. CSV cannot
/// carry cell styles, so the layout's highlight is not rendered.
pub struct CsvReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvReportWriter<File> {
    /// Writer creating (or truncating) the file at `path`
    pub fn to_path(path: impl AsRef<Path>) -> InterestResult<Self> {
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
        })
    }
}

impl<W: Write> CsvReportWriter<W> {
    /// Writer over any byte sink
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().flexible(true).from_writer(writer),
        }
    }

    /// Flush and return the underlying sink
    pub fn into_inner(self) -> InterestResult<W> {
        self.writer.into_inner().map_err(|e| {
            InterestError::Io(std::io::Error::new(e.error().kind(), e.error().to_string()))
        })
    }
}

impl<W: Write> ReportRenderer for CsvReportWriter<W> {
    fn render(&mut self, report: &InterestReport) -> InterestResult<()> {
        let table = &report.table;
        let layout = &report.layout;

        self.writer.write_record(&table.columns)?;

        let date_columns: Vec<bool> = table
            .columns
            .iter()
            .map(|c| layout.date_columns.contains(c))
            .collect();

        for row in 0..table.row_count() {
            let record: Vec<String> = (0..table.columns.len())
                .map(|col| format_cell(table.cell(row, col), date_columns[col]))
                .collect();
            self.writer.write_record(&record)?;
        }

        if let Some(total_col) = table.column_index(&layout.total_column) {
            let mut totals = vec![String::new(); table.columns.len()];
            totals[0] = "Total".to_string();
            totals[total_col] = report.summary().total_interest_text();
            self.writer.write_record(&totals)?;
        }

        self.writer.flush()?;
        Ok(())
    }
}

fn format_cell(cell: &Cell, is_date_column: bool) -> String {
    match cell {
        Cell::Date(d) if is_date_column => d.format(REPORT_DATE_FORMAT).to_string(),
        Cell::DateTime(dt) if is_date_column => dt.format(REPORT_DATE_FORMAT).to_string(),
        Cell::Number(n) if n.fract() == 0.0 => format!("{n:.0}"),
        Cell::Number(n) => format!("{n:.2}"),
        other => other.to_string(),
    }
}
