//! Pipeline orchestration: resolve → clean → merge → index → reconcile → rollup.

use std::collections::HashSet;

use crate::clean;
use crate::columns;
use crate::config::RecapConfig;
use crate::error::ReconError;
use crate::index::{canon_creator, MatchIndex};
use crate::ledger;
use crate::model::{
    ContentRecord, RawTable, RecapMeta, RecapResult, RecapSummary, RecapWarning,
    ReconciledRecord, RollupEntry, ScrapeFailure,
};
use crate::rollup;

/// Resolve a revenue figure for every scraped record: by content id, by
/// creator handle, defaulting to zero. Best-effort enrichment, not a strict
/// join — a record with no match is still valid output.
pub fn reconcile(records: &[ContentRecord], index: &MatchIndex) -> Vec<ReconciledRecord> {
    records
        .iter()
        .map(|record| ReconciledRecord {
            record: record.clone(),
            revenue_by_content: index.content_revenue(record.content_id.as_deref()),
            revenue_by_creator: index.creator_revenue(record.creator_handle.as_deref()),
        })
        .collect()
}

/// Run one full reconciliation. Never fails: row- and file-level problems are
/// recovered locally and batch-level ambiguity becomes a warning; the worst
/// outcome is an all-zero revenue column with a warning attached.
pub fn run(
    config: &RecapConfig,
    tables: &[RawTable],
    records: &[ContentRecord],
    failures: &[ScrapeFailure],
) -> RecapResult {
    let mut warnings = Vec::new();
    let mut cleaned = Vec::with_capacity(tables.len());
    let mut any_matching_key = false;

    for table in tables {
        let roles = columns::resolve_with_overrides(&table.columns, &config.columns);
        match clean::clean(table, &roles) {
            Ok(cleaned_table) => {
                any_matching_key |= roles.has_matching_key();
                cleaned.push(cleaned_table);
            }
            Err(e) => {
                let file = match e {
                    ReconError::MissingAmountColumn { file } => file,
                    _ => table.source_file.clone(),
                };
                warnings.push(RecapWarning::MissingAmountColumn { file });
            }
        }
    }

    if !tables.is_empty() && !any_matching_key {
        warnings.push(RecapWarning::NoMatchingKey);
    }

    let merged = ledger::merge(&cleaned);
    let index = MatchIndex::build(&merged, config.loose_creator_match);
    let reconciled = reconcile(records, &index);

    let full_rollup = rollup::rollup(
        &reconciled,
        &index,
        config.revenue_field,
        config.engagement_counter,
        &config.sort,
    );

    let summary = summarize(
        &reconciled,
        &index,
        &full_rollup,
        failures.len(),
        cleaned.len(),
        tables.len() - cleaned.len(),
        merged.rows.len(),
    );

    let (rollup, watchlist_missing) =
        apply_watchlist(full_rollup, &config.watchlist, config.loose_creator_match);

    RecapResult {
        meta: RecapMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            sort_key: config.sort.key,
            ascending: config.sort.ascending,
            revenue_field: config.revenue_field,
            engagement_counter: config.engagement_counter,
        },
        summary,
        warnings,
        records: reconciled,
        rollup,
        watchlist_missing,
        failures: failures.to_vec(),
    }
}

fn summarize(
    records: &[ReconciledRecord],
    index: &MatchIndex,
    full_rollup: &[RollupEntry],
    scrape_failures: usize,
    files_loaded: usize,
    files_skipped: usize,
    ledger_rows: usize,
) -> RecapSummary {
    RecapSummary {
        scraped_records: records.len(),
        scrape_failures,
        files_loaded,
        files_skipped,
        ledger_rows,
        matched_by_content: records
            .iter()
            .filter(|r| index.has_content(r.record.content_id.as_deref()))
            .count(),
        matched_by_creator: records
            .iter()
            .filter(|r| index.has_creator(r.record.creator_handle.as_deref()))
            .count(),
        creators: full_rollup.len(),
        total_revenue_by_content: records.iter().map(|r| r.revenue_by_content).sum(),
        total_revenue_by_creator: records.iter().map(|r| r.revenue_by_creator).sum(),
    }
}

/// Filter the rollup down to a watchlist, reporting names with no matching
/// creator in the data instead of dropping them silently.
fn apply_watchlist(
    full_rollup: Vec<RollupEntry>,
    watchlist: &[String],
    loose: bool,
) -> (Vec<RollupEntry>, Vec<String>) {
    if watchlist.is_empty() {
        return (full_rollup, Vec::new());
    }

    let wanted: HashSet<String> = watchlist
        .iter()
        .filter_map(|name| canon_creator(name, loose))
        .collect();
    let present: HashSet<String> = full_rollup
        .iter()
        .filter_map(|entry| canon_creator(&entry.creator, loose))
        .collect();

    let missing = watchlist
        .iter()
        .filter(|name| {
            canon_creator(name, loose).is_some_and(|key| !present.contains(&key))
        })
        .cloned()
        .collect();

    let filtered = full_rollup
        .into_iter()
        .filter(|entry| {
            canon_creator(&entry.creator, loose).is_some_and(|key| wanted.contains(&key))
        })
        .collect();

    (filtered, missing)
}
