use serde::{Deserialize, Serialize};

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Run options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecapConfig {
    pub sort: SortConfig,
    pub revenue_field: RevenueField,
    pub engagement_counter: EngagementCounter,
    /// Lowercase creator keys on both sides of the match. Off by default:
    /// platform handles are case-sensitive.
    pub loose_creator_match: bool,
    pub columns: ColumnOverrides,
    pub watchlist: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SortConfig {
    pub key: SortKey,
    pub ascending: bool,
}

impl Default for SortConfig {
    fn default() -> Self {
        // The recap has always been presented largest-revenue-first.
        Self { key: SortKey::Revenue, ascending: false }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Revenue,
    Engagement,
    ContentCount,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueField {
    #[default]
    ByContent,
    ByCreator,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementCounter {
    #[default]
    Play,
    Like,
    Comment,
    Share,
}

/// Explicit column names that bypass keyword discovery for a role.
/// An override that names a column absent from a file leaves that role
/// unresolved for that file — it does not fall back to discovery.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ColumnOverrides {
    pub amount: Option<String>,
    pub status: Option<String>,
    pub content_link: Option<String>,
    pub creator_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl RecapConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: RecapConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        for (role, value) in [
            ("amount", &self.columns.amount),
            ("status", &self.columns.status),
            ("content_link", &self.columns.content_link),
            ("creator_key", &self.columns.creator_key),
        ] {
            if let Some(name) = value {
                if name.trim().is_empty() {
                    return Err(ReconError::ConfigValidation(format!(
                        "columns.{role} must not be empty"
                    )));
                }
            }
        }

        if self.watchlist.iter().any(|name| name.trim().is_empty()) {
            return Err(ReconError::ConfigValidation(
                "watchlist entries must not be empty".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
