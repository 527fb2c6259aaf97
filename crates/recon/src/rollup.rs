//! Per-creator rollup of reconciled records.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::{EngagementCounter, RevenueField, SortConfig, SortKey};
use crate::index::MatchIndex;
use crate::model::{ReconciledRecord, RollupEntry};

/// Records with no creator handle are never silently dropped; they land in
/// this one fixed bucket.
pub const UNKNOWN_CREATOR: &str = "(unknown)";

/// Group reconciled records by creator handle, summing the chosen engagement
/// counter and revenue field. Sort order is deterministic: the selected key
/// in the selected direction, ties always broken by creator handle ascending.
pub fn rollup(
    records: &[ReconciledRecord],
    index: &MatchIndex,
    revenue_field: RevenueField,
    counter: EngagementCounter,
    sort: &SortConfig,
) -> Vec<RollupEntry> {
    struct Group {
        count: u64,
        engagement: u64,
        revenue: i64,
        sources: BTreeSet<String>,
    }

    let mut groups: BTreeMap<String, Group> = BTreeMap::new();

    for record in records {
        let handle = record
            .record
            .creator_handle
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .unwrap_or(UNKNOWN_CREATOR);

        let revenue = match revenue_field {
            RevenueField::ByContent => record.revenue_by_content,
            RevenueField::ByCreator => record.revenue_by_creator,
        };

        let group = groups.entry(handle.to_string()).or_insert_with(|| Group {
            count: 0,
            engagement: 0,
            revenue: 0,
            sources: BTreeSet::new(),
        });
        group.count += 1;
        group.engagement += record.record.engagement.get(counter);
        group.revenue += revenue;

        if handle != UNKNOWN_CREATOR {
            group.sources.extend(index.sources_for_creator(handle));
        }
        if let Some(id) = record.record.content_id.as_deref() {
            if let Some(source) = index.source_for_content(id) {
                group.sources.insert(source.to_string());
            }
        }
    }

    let mut entries: Vec<RollupEntry> = groups
        .into_iter()
        .map(|(creator, g)| RollupEntry {
            creator,
            total_content_items: g.count,
            total_engagement: g.engagement,
            total_revenue: g.revenue,
            sources: g.sources.into_iter().collect(),
        })
        .collect();

    entries.sort_by(|a, b| {
        let ord = match sort.key {
            SortKey::Revenue => a.total_revenue.cmp(&b.total_revenue),
            SortKey::Engagement => a.total_engagement.cmp(&b.total_engagement),
            SortKey::ContentCount => a.total_content_items.cmp(&b.total_content_items),
        };
        let ord = if sort.ascending { ord } else { ord.reverse() };
        ord.then_with(|| a.creator.cmp(&b.creator))
    });

    entries
}
