//! In-memory table source and report sink for testing

use std::sync::{Arc, RwLock};

use crate::ledger::InterestReport;
use crate::traits::*;
use crate::types::*;

/// In-memory collaborator: serves a fixed table and keeps every rendered report
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    table: Table,
    rendered: Arc<RwLock<Vec<InterestReport>>>,
}

impl MemoryTable {
    /// Create a source serving `table`
    pub fn new(table: Table) -> Self {
        Self {
            table,
            rendered: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Reports rendered so far, oldest first
    pub fn rendered(&self) -> Vec<InterestReport> {
        self.rendered
            .read()
            .map(|reports| reports.clone())
            .unwrap_or_default()
    }

    /// Number of reports rendered so far
    pub fn render_count(&self) -> usize {
        self.rendered.read().map(|reports| reports.len()).unwrap_or(0)
    }
}

impl TableSource for MemoryTable {
    fn read_table(&mut self) -> InterestResult<Table> {
        Ok(self.table.clone())
    }
}

impl ReportRenderer for MemoryTable {
    fn render(&mut self, report: &InterestReport) -> InterestResult<()> {
        self.rendered
            .write()
            .map_err(|_| {
                InterestError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "report store poisoned",
                ))
            })?
            .push(report.clone());
        Ok(())
    }
}
