//! Match index construction from the merged ledger.
//!
//! The two lookups deliberately use opposite aggregation policies:
//!
//! - `by_content_id` is **unique-first**: a content id names exactly one
//!   video, so the same id on multiple ledger rows means the same underlying
//!   transaction was re-exported (overlapping file uploads). The
//!   first-encountered amount wins; summing would double-count.
//! - `by_creator` is **aggregate-sum**: a creator key spans many distinct
//!   order rows, so their total revenue is the sum across all of them.
//!
//! Getting this asymmetry backwards makes totals swing by orders of
//! magnitude depending on which files were uploaded together.

use std::collections::{BTreeSet, HashMap};

use crate::model::Ledger;

#[derive(Debug, Clone, Default)]
pub struct MatchIndex {
    /// content_id → amount, first-seen row wins.
    pub by_content_id: HashMap<String, i64>,
    /// creator key → summed amount across all of that creator's rows.
    pub by_creator: HashMap<String, i64>,

    loose_creator_match: bool,
    content_source: HashMap<String, String>,
    creator_sources: HashMap<String, BTreeSet<String>>,
}

impl MatchIndex {
    pub fn build(ledger: &Ledger, loose_creator_match: bool) -> MatchIndex {
        let mut index = MatchIndex {
            loose_creator_match,
            ..MatchIndex::default()
        };

        for row in &ledger.rows {
            if let Some(id) = row.content_id.as_deref() {
                let id = id.trim();
                if !id.is_empty() && !index.by_content_id.contains_key(id) {
                    index.by_content_id.insert(id.to_string(), row.amount);
                    index
                        .content_source
                        .insert(id.to_string(), row.source_file.clone());
                }
            }

            if let Some(key) = row.creator_key.as_deref() {
                if let Some(key) = canon_creator(key, loose_creator_match) {
                    *index.by_creator.entry(key.clone()).or_insert(0) += row.amount;
                    index
                        .creator_sources
                        .entry(key)
                        .or_default()
                        .insert(row.source_file.clone());
                }
            }
        }

        index
    }

    /// Revenue matched to a content id, zero when absent.
    pub fn content_revenue(&self, content_id: Option<&str>) -> i64 {
        content_id
            .map(str::trim)
            .and_then(|id| self.by_content_id.get(id))
            .copied()
            .unwrap_or(0)
    }

    /// Whether a content id has a ledger match (even a zero-amount one).
    pub fn has_content(&self, content_id: Option<&str>) -> bool {
        content_id
            .map(str::trim)
            .is_some_and(|id| self.by_content_id.contains_key(id))
    }

    /// Summed revenue matched to a creator handle, zero when absent.
    pub fn creator_revenue(&self, handle: Option<&str>) -> i64 {
        self.canon(handle)
            .and_then(|key| self.by_creator.get(&key))
            .copied()
            .unwrap_or(0)
    }

    pub fn has_creator(&self, handle: Option<&str>) -> bool {
        self.canon(handle)
            .is_some_and(|key| self.by_creator.contains_key(&key))
    }

    /// Source file a content id's amount was taken from.
    pub fn source_for_content(&self, content_id: &str) -> Option<&str> {
        self.content_source
            .get(content_id.trim())
            .map(String::as_str)
    }

    /// Distinct source files contributing to a creator's total, sorted.
    pub fn sources_for_creator(&self, handle: &str) -> Vec<String> {
        self.canon(Some(handle))
            .and_then(|key| self.creator_sources.get(&key))
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn canon(&self, handle: Option<&str>) -> Option<String> {
        handle.and_then(|h| canon_creator(h, self.loose_creator_match))
    }
}

/// Canonical creator key: trimmed, optionally lowercased. `None` when the
/// trimmed key is empty.
pub(crate) fn canon_creator(key: &str, loose: bool) -> Option<String> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(if loose {
        trimmed.to_lowercase()
    } else {
        trimmed.to_string()
    })
}
