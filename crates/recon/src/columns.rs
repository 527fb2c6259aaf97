//! Column role discovery over arbitrary export headers.
//!
//! Revenue exports carry no fixed schema; the same platform emits
//! `"GMV"`, `"Total GMV (Rp)"`, or `"gmv_amount"` depending on export era.
//! Discovery is fuzzy (case-insensitive substring keywords) but localized
//! here, so the rest of the pipeline stays strongly typed.

use crate::config::ColumnOverrides;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub index: usize,
    pub name: String,
}

/// The semantic roles a revenue export's columns can play. Every field is
/// optional: an unresolved role disables one strategy, not the whole file —
/// except `amount`, which the cleaner treats as fatal for that file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRoles {
    pub amount: Option<ResolvedColumn>,
    pub refunded_amount: Option<ResolvedColumn>,
    pub status: Option<ResolvedColumn>,
    pub content_link: Option<ResolvedColumn>,
    pub creator_key: Option<ResolvedColumn>,
}

impl ColumnRoles {
    /// Whether this file can contribute to either matching strategy.
    pub fn has_matching_key(&self) -> bool {
        self.content_link.is_some() || self.creator_key.is_some()
    }
}

/// Resolve roles by keyword discovery: first column in original order whose
/// lowercased name matches the role's keywords.
pub fn resolve(columns: &[String]) -> ColumnRoles {
    let lower: Vec<String> = columns.iter().map(|c| c.to_lowercase()).collect();

    ColumnRoles {
        amount: find(columns, &lower, |h| {
            h.contains("gmv") && !h.contains("refund")
        }),
        refunded_amount: find(columns, &lower, |h| {
            h.contains("gmv") && h.contains("refund")
        }),
        status: find(columns, &lower, |h| h.contains("status")),
        content_link: find(columns, &lower, |h| h.contains("video link")),
        creator_key: find(columns, &lower, |h| {
            h.contains("creator name") || h.contains("nickname")
        }),
    }
}

/// Resolve roles, letting explicit config overrides bypass discovery.
/// An override is matched against headers case-insensitively but exactly;
/// if the named column is absent the role stays unresolved for this file.
pub fn resolve_with_overrides(columns: &[String], overrides: &ColumnOverrides) -> ColumnRoles {
    let mut roles = resolve(columns);

    if let Some(name) = &overrides.amount {
        roles.amount = find_exact(columns, name);
    }
    if let Some(name) = &overrides.status {
        roles.status = find_exact(columns, name);
    }
    if let Some(name) = &overrides.content_link {
        roles.content_link = find_exact(columns, name);
    }
    if let Some(name) = &overrides.creator_key {
        roles.creator_key = find_exact(columns, name);
    }

    roles
}

fn find(
    columns: &[String],
    lower: &[String],
    matches: impl Fn(&str) -> bool,
) -> Option<ResolvedColumn> {
    lower.iter().position(|h| matches(h)).map(|index| ResolvedColumn {
        index,
        name: columns[index].clone(),
    })
}

fn find_exact(columns: &[String], name: &str) -> Option<ResolvedColumn> {
    let wanted = name.trim().to_lowercase();
    columns
        .iter()
        .position(|c| c.trim().to_lowercase() == wanted)
        .map(|index| ResolvedColumn {
            index,
            name: columns[index].clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolves_typical_campaign_export() {
        let roles = resolve(&cols(&[
            "Order ID",
            "Video Link",
            "Creator Name",
            "Order Status",
            "GMV",
            "Refunded GMV",
        ]));
        assert_eq!(roles.amount.as_ref().unwrap().name, "GMV");
        assert_eq!(roles.amount.as_ref().unwrap().index, 4);
        assert_eq!(roles.refunded_amount.as_ref().unwrap().name, "Refunded GMV");
        assert_eq!(roles.status.as_ref().unwrap().name, "Order Status");
        assert_eq!(roles.content_link.as_ref().unwrap().name, "Video Link");
        assert_eq!(roles.creator_key.as_ref().unwrap().name, "Creator Name");
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let roles = resolve(&cols(&["total gmv (rp)", "creator nickname", "STATUS"]));
        assert_eq!(roles.amount.as_ref().unwrap().index, 0);
        assert_eq!(roles.creator_key.as_ref().unwrap().index, 1);
        assert_eq!(roles.status.as_ref().unwrap().index, 2);
    }

    #[test]
    fn refund_column_never_wins_amount_role() {
        // Refunded GMV appears first; amount must skip it.
        let roles = resolve(&cols(&["Refunded GMV", "GMV"]));
        assert_eq!(roles.amount.as_ref().unwrap().name, "GMV");
        assert_eq!(roles.refunded_amount.as_ref().unwrap().name, "Refunded GMV");
    }

    #[test]
    fn first_match_in_original_order_wins() {
        let roles = resolve(&cols(&["GMV (net)", "GMV (gross)"]));
        assert_eq!(roles.amount.as_ref().unwrap().index, 0);
    }

    #[test]
    fn unresolved_roles_are_absent() {
        let roles = resolve(&cols(&["Order ID", "Quantity"]));
        assert_eq!(roles, ColumnRoles::default());
        assert!(!roles.has_matching_key());
    }

    #[test]
    fn override_bypasses_discovery() {
        let overrides = ColumnOverrides {
            amount: Some("Payout".into()),
            ..ColumnOverrides::default()
        };
        let roles = resolve_with_overrides(&cols(&["Payout", "GMV"]), &overrides);
        assert_eq!(roles.amount.as_ref().unwrap().name, "Payout");
    }

    #[test]
    fn override_missing_column_leaves_role_unresolved() {
        let overrides = ColumnOverrides {
            amount: Some("Payout".into()),
            ..ColumnOverrides::default()
        };
        let roles = resolve_with_overrides(&cols(&["GMV"]), &overrides);
        assert!(roles.amount.is_none(), "override must not fall back to discovery");
    }
}
