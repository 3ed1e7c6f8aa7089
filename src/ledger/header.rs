//! Header row detection for ledgers exported with leading noise rows

use tracing::debug;

use crate::types::*;

/// Find the true header row and relabel the table with it
///
/// Scans rows `0..=min(scan_limit, rows - 1)` for the first row whose cells
/// cover every label in `required`. The cells of that row become the column
/// labels (empty cells are named `Unnamed0`, `Unnamed1`, ...) and only the
/// rows below it are kept. The header is as wide as the wider of the old
/// labels and the header row. When no row qualifies the table is returned as is.
pub fn locate_header(table: &Table, required: &[&str], scan_limit: usize) -> Table {
    let found = table
        .rows
        .iter()
        .take(scan_limit.saturating_add(1))
        .enumerate()
        .find(|(_, row)| covers_labels(row, required));

    let Some((header_index, header_row)) = found else {
        debug!(scan_limit, "no header row found, using table as is");
        return table.clone();
    };

    let width = table.columns.len().max(header_row.len());
    let mut unnamed = 0usize;
    let columns = (0..width)
        .map(|col| match header_row.get(col).and_then(Cell::label) {
            Some(label) if !label.is_empty() => label,
            _ => {
                let name = format!("Unnamed{unnamed}");
                unnamed += 1;
                name
            }
        })
        .collect();

    debug!(header_index, unnamed, "located header row");

    Table::new(columns, table.rows[header_index + 1..].to_vec())
}

fn covers_labels(row: &[Cell], required: &[&str]) -> bool {
    let labels: Vec<String> = row.iter().filter_map(Cell::label).collect();
    required
        .iter()
        .all(|name| labels.iter().any(|label| label == name))
}
