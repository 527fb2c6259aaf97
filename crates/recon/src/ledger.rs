//! Ledger assembly: concatenate cleaned tables from multiple uploads.

use crate::model::{Cell, CleanedTable, Ledger};

/// Merge cleaned tables into one ledger, preserving the column union in
/// first-seen order. Rows from files lacking a column present in other files
/// get an empty cell there. Upload order is preserved; deduplication is an
/// index-building concern, not a merge concern — the same logical row may
/// carry different column sets across files.
pub fn merge(tables: &[CleanedTable]) -> Ledger {
    let mut columns: Vec<String> = Vec::new();
    for table in tables {
        for name in &table.columns {
            if !columns.contains(name) {
                columns.push(name.clone());
            }
        }
    }

    let mut rows = Vec::with_capacity(tables.iter().map(|t| t.rows.len()).sum());
    for table in tables {
        // Position of each union column within this table, if present.
        let mapping: Vec<Option<usize>> = columns
            .iter()
            .map(|name| table.columns.iter().position(|c| c == name))
            .collect();

        for row in &table.rows {
            let mut aligned = row.clone();
            aligned.cells = mapping
                .iter()
                .map(|pos| match pos {
                    Some(i) => row.cells.get(*i).cloned().unwrap_or(Cell::Empty),
                    None => Cell::Empty,
                })
                .collect();
            rows.push(aligned);
        }
    }

    Ledger { columns, rows }
}
