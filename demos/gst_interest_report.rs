//! Compute GST interest for a ledger file and write the report next to it
//!
//! ```text
//! cargo run --example gst_interest_report -- supplier_ledger.csv
//! ```

use std::path::{Path, PathBuf};

use gst_interest::io::{open_table, CsvReportWriter};
use gst_interest::{
    calculate_gst_interest, InterestConfig, InterestError, ReportRenderer, TableSource,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("ledger");
    input.with_file_name(format!("{stem}-gst_interest.csv"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let Some(input) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("usage: gst_interest_report <ledger.csv> [config.toml]");
        std::process::exit(2);
    };

    let config = match std::env::args().nth(2) {
        Some(path) => InterestConfig::from_toml(&std::fs::read_to_string(path)?)?,
        None => InterestConfig::default(),
    };

    let mut source = match open_table(&input) {
        Ok(source) => source,
        Err(InterestError::UnsupportedFormat(reason)) => {
            warn!(%reason, "skipping unsupported ledger file");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let table = source.read_table()?;
    let report = calculate_gst_interest(&table, &config)?;
    if report.is_empty() {
        println!("No dated ledger rows found in {}", input.display());
        return Ok(());
    }

    let output = output_path(&input);
    CsvReportWriter::to_path(&output)?.render(&report)?;

    let summary = report.summary();
    println!("Report written to {}", output.display());
    println!("  Records:            {}", report.rows.len());
    println!("  Total liability:    {:.2}", summary.total_liability);
    println!("  Total allocated:    {:.2}", summary.total_allocated);
    println!("  Delayed (>180 days): {}", summary.delayed_records);
    println!("  Unresolved balance: {:.2}", summary.unresolved_balance);
    println!("  Total interest:     {}", summary.total_interest_text());

    Ok(())
}
