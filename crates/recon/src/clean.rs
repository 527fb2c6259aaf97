//! Revenue table cleaning: refund removal and amount canonicalization.

use crate::columns::ColumnRoles;
use crate::error::ReconError;
use crate::ident;
use crate::model::{Cell, CleanStats, CleanedTable, RawTable, RevenueRow};
use crate::money;

/// Clean one raw revenue export. Pipeline, in order:
///
/// 1. Drop every column whose name contains `refunded` — informational
///    columns that must never be summed into revenue.
/// 2. Drop every row whose status value is `refunded` (case-insensitive),
///    when a status column survives step 1.
/// 3. Canonicalize the amount column; rows with no extractable digits are
///    placeholder text and are dropped.
/// 4. Drop rows with a negative amount (malformed exports only; steps 1–2
///    already removed legitimate refunds).
///
/// Returns `MissingAmountColumn` when no amount role resolved; the caller
/// surfaces that as a warning and skips the file rather than failing the run.
pub fn clean(table: &RawTable, roles: &ColumnRoles) -> Result<CleanedTable, ReconError> {
    let amount = roles
        .amount
        .as_ref()
        .ok_or_else(|| ReconError::MissingAmountColumn {
            file: table.source_file.clone(),
        })?;

    let mut kept: Vec<usize> = Vec::with_capacity(table.columns.len());
    let mut dropped_columns = Vec::new();
    for (i, name) in table.columns.iter().enumerate() {
        if name.to_lowercase().contains("refunded") {
            dropped_columns.push(name.clone());
        } else {
            kept.push(i);
        }
    }

    let columns: Vec<String> = kept.iter().map(|&i| table.columns[i].clone()).collect();
    let amount_pos = kept.iter().position(|&i| i == amount.index);
    // Status filtering only applies when the status column itself survived
    // the refunded-column drop.
    let status_idx = roles
        .status
        .as_ref()
        .filter(|c| kept.contains(&c.index))
        .map(|c| c.index);

    let mut stats = CleanStats {
        dropped_columns,
        ..CleanStats::default()
    };
    let mut rows = Vec::with_capacity(table.rows.len());

    for row in &table.rows {
        let cell = |i: usize| row.get(i).unwrap_or(&Cell::Empty);

        if let Some(si) = status_idx {
            if cell(si).display().trim().eq_ignore_ascii_case("refunded") {
                stats.refunded_rows += 1;
                continue;
            }
        }

        let Some(amt) = money::normalize_strict(cell(amount.index)) else {
            stats.malformed_rows += 1;
            continue;
        };
        if amt < 0 {
            stats.negative_rows += 1;
            continue;
        }

        let content_id = roles
            .content_link
            .as_ref()
            .and_then(|c| cell(c.index).text().and_then(ident::extract));
        let creator_key = roles.creator_key.as_ref().and_then(|c| {
            let name = cell(c.index).display();
            let name = name.trim();
            (!name.is_empty()).then(|| name.to_string())
        });

        let mut cells: Vec<Cell> = kept.iter().map(|&i| cell(i).clone()).collect();
        if let Some(p) = amount_pos {
            cells[p] = Cell::Int(amt);
        }

        rows.push(RevenueRow {
            source_file: table.source_file.clone(),
            amount: amt,
            content_id,
            creator_key,
            cells,
        });
    }

    Ok(CleanedTable {
        source_file: table.source_file.clone(),
        columns,
        rows,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns;

    fn table(source: &str, columns: &[&str], rows: Vec<Vec<Cell>>) -> RawTable {
        RawTable {
            source_file: source.into(),
            columns: columns.iter().map(|s| s.to_string()).collect(),
            rows,
        }
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.into())
    }

    fn campaign_table() -> RawTable {
        table(
            "campaign.csv",
            &["Video Link", "Creator Name", "Order Status", "GMV", "Refunded GMV"],
            vec![
                vec![
                    text("https://t.example/video/111"),
                    text("alice"),
                    text("Completed"),
                    text("Rp500.000"),
                    text("Rp0"),
                ],
                vec![
                    text("https://t.example/video/222"),
                    text("bob"),
                    text("Refunded"),
                    text("Rp300.000"),
                    text("Rp300.000"),
                ],
                vec![
                    text("https://t.example/video/333"),
                    text("  carol  "),
                    text("Completed"),
                    text("pending payout"),
                    Cell::Empty,
                ],
            ],
        )
    }

    #[test]
    fn drops_refunded_columns_rows_and_malformed_amounts() {
        let raw = campaign_table();
        let roles = columns::resolve(&raw.columns);
        let cleaned = clean(&raw, &roles).unwrap();

        assert_eq!(
            cleaned.columns,
            vec!["Video Link", "Creator Name", "Order Status", "GMV"]
        );
        assert_eq!(cleaned.stats.dropped_columns, vec!["Refunded GMV"]);
        assert_eq!(cleaned.stats.refunded_rows, 1);
        assert_eq!(cleaned.stats.malformed_rows, 1);

        assert_eq!(cleaned.rows.len(), 1);
        let row = &cleaned.rows[0];
        assert_eq!(row.amount, 500_000);
        assert_eq!(row.content_id.as_deref(), Some("111"));
        assert_eq!(row.creator_key.as_deref(), Some("alice"));
        assert_eq!(row.source_file, "campaign.csv");
        // Amount cell is canonical after cleaning.
        assert_eq!(row.cells[3], Cell::Int(500_000));
    }

    #[test]
    fn status_match_is_case_insensitive() {
        let raw = table(
            "x.csv",
            &["Status", "GMV"],
            vec![
                vec![text("REFUNDED"), text("100")],
                vec![text("refunded "), text("200")],
                vec![text("completed"), text("300")],
            ],
        );
        let roles = columns::resolve(&raw.columns);
        let cleaned = clean(&raw, &roles).unwrap();
        assert_eq!(cleaned.stats.refunded_rows, 2);
        assert_eq!(cleaned.rows.len(), 1);
        assert_eq!(cleaned.rows[0].amount, 300);
    }

    #[test]
    fn negative_amounts_are_dropped() {
        let raw = table(
            "x.csv",
            &["GMV"],
            vec![vec![Cell::Float(-500.0)], vec![Cell::Int(700)]],
        );
        let roles = columns::resolve(&raw.columns);
        let cleaned = clean(&raw, &roles).unwrap();
        assert_eq!(cleaned.stats.negative_rows, 1);
        assert_eq!(cleaned.rows.len(), 1);
        assert_eq!(cleaned.rows[0].amount, 700);
    }

    #[test]
    fn creator_key_is_trimmed_and_empty_is_absent() {
        let raw = table(
            "x.csv",
            &["Creator Name", "GMV"],
            vec![
                vec![text("  dave "), text("100")],
                vec![text("   "), text("200")],
            ],
        );
        let roles = columns::resolve(&raw.columns);
        let cleaned = clean(&raw, &roles).unwrap();
        assert_eq!(cleaned.rows[0].creator_key.as_deref(), Some("dave"));
        assert_eq!(cleaned.rows[1].creator_key, None);
    }

    #[test]
    fn missing_amount_role_names_the_file() {
        let raw = table("orders.xlsx", &["Order ID"], vec![]);
        let roles = columns::resolve(&raw.columns);
        let err = clean(&raw, &roles).unwrap_err();
        assert!(err.to_string().contains("orders.xlsx"));
    }

    #[test]
    fn no_surviving_column_name_contains_refunded() {
        let raw = campaign_table();
        let roles = columns::resolve(&raw.columns);
        let cleaned = clean(&raw, &roles).unwrap();
        assert!(cleaned
            .columns
            .iter()
            .all(|c| !c.to_lowercase().contains("refunded")));
    }

    #[test]
    fn short_rows_pad_with_empty_cells() {
        let raw = table(
            "x.csv",
            &["GMV", "Creator Name"],
            vec![vec![text("100")]],
        );
        let roles = columns::resolve(&raw.columns);
        let cleaned = clean(&raw, &roles).unwrap();
        assert_eq!(cleaned.rows[0].amount, 100);
        assert_eq!(cleaned.rows[0].creator_key, None);
        assert_eq!(cleaned.rows[0].cells[1], Cell::Empty);
    }
}
