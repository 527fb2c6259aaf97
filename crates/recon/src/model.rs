use serde::{Deserialize, Serialize};

use crate::config::{EngagementCounter, RevenueField, SortKey};

// ---------------------------------------------------------------------------
// Input: revenue tables
// ---------------------------------------------------------------------------

/// A single cell from an uploaded revenue export. Exports arrive with no
/// enforced schema, so cells keep whatever type the file reader produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Borrow the cell as text, if it is text.
    pub fn text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render the cell the way a spreadsheet would display it.
    pub fn display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Int(v) => v.to_string(),
            Cell::Float(v) => v.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }
}

/// One raw revenue export, as read from disk: a header row plus data rows.
/// Column meaning is discovered at run time, never assumed.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub source_file: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

// ---------------------------------------------------------------------------
// Input: scraped content records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementCounts {
    #[serde(default)]
    pub play: u64,
    #[serde(default)]
    pub like: u64,
    #[serde(default)]
    pub comment: u64,
    #[serde(default)]
    pub share: u64,
}

impl EngagementCounts {
    pub fn get(&self, counter: EngagementCounter) -> u64 {
        match counter {
            EngagementCounter::Play => self.play,
            EngagementCounter::Like => self.like,
            EngagementCounter::Comment => self.comment,
            EngagementCounter::Share => self.share,
        }
    }
}

/// One successfully scraped content item. Immutable once constructed; the
/// scraping collaborator owns fetching and error reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub content_url: String,
    /// Platform-assigned numeric identifier; the highest-confidence match key.
    #[serde(default)]
    pub content_id: Option<String>,
    /// Platform username. Case-sensitive on the platform itself.
    #[serde(default)]
    pub creator_handle: Option<String>,
    #[serde(default)]
    pub creator_display_name: String,
    #[serde(default)]
    pub engagement: EngagementCounts,
    #[serde(default)]
    pub follower_count: u64,
    #[serde(default)]
    pub create_time: Option<i64>,
    #[serde(default)]
    pub music_title: Option<String>,
    #[serde(default)]
    pub scraped_at: String,
}

/// A content URL the scraping collaborator could not fetch. Excluded from
/// reconciliation, reported separately, never aborts the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeFailure {
    pub content_url: String,
    pub error: String,
}

// ---------------------------------------------------------------------------
// Cleaned revenue data
// ---------------------------------------------------------------------------

/// One revenue row after cleaning: refund-free, amount canonicalized to whole
/// currency units, match keys extracted.
#[derive(Debug, Clone)]
pub struct RevenueRow {
    pub source_file: String,
    pub amount: i64,
    pub content_id: Option<String>,
    pub creator_key: Option<String>,
    /// Surviving cells, aligned to the owning table's (or ledger's) columns.
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Default)]
pub struct CleanStats {
    pub dropped_columns: Vec<String>,
    pub refunded_rows: usize,
    pub malformed_rows: usize,
    pub negative_rows: usize,
}

#[derive(Debug, Clone)]
pub struct CleanedTable {
    pub source_file: String,
    pub columns: Vec<String>,
    pub rows: Vec<RevenueRow>,
    pub stats: CleanStats,
}

/// The merged revenue ledger: every cleaned row from every contributing file,
/// in upload order, over the union of their columns.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    pub columns: Vec<String>,
    pub rows: Vec<RevenueRow>,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A scraped record enriched with resolved revenue. Both fields are always
/// populated; no match means zero, not null.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledRecord {
    #[serde(flatten)]
    pub record: ContentRecord,
    pub revenue_by_content: i64,
    pub revenue_by_creator: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollupEntry {
    pub creator: String,
    pub total_content_items: u64,
    pub total_engagement: u64,
    pub total_revenue: i64,
    /// Distinct revenue files this creator's matched revenue came from.
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecapWarning {
    /// No column resolved to the amount role; the file contributed nothing.
    MissingAmountColumn { file: String },
    /// No uploaded file resolved a content link or creator column, so every
    /// revenue figure is zero by construction.
    NoMatchingKey,
}

impl std::fmt::Display for RecapWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingAmountColumn { file } => {
                write!(f, "no amount column found in '{file}'; file skipped")
            }
            Self::NoMatchingKey => {
                write!(
                    f,
                    "no content link or creator column found in any revenue file; \
                     all revenue will be zero"
                )
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecapSummary {
    pub scraped_records: usize,
    pub scrape_failures: usize,
    pub files_loaded: usize,
    pub files_skipped: usize,
    pub ledger_rows: usize,
    pub matched_by_content: usize,
    pub matched_by_creator: usize,
    pub creators: usize,
    pub total_revenue_by_content: i64,
    pub total_revenue_by_creator: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecapMeta {
    pub engine_version: String,
    pub run_at: String,
    pub sort_key: SortKey,
    pub ascending: bool,
    pub revenue_field: RevenueField,
    pub engagement_counter: EngagementCounter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecapResult {
    pub meta: RecapMeta,
    pub summary: RecapSummary,
    pub warnings: Vec<RecapWarning>,
    pub records: Vec<ReconciledRecord>,
    pub rollup: Vec<RollupEntry>,
    /// Watchlist names with no matching creator in the data.
    pub watchlist_missing: Vec<String>,
    pub failures: Vec<ScrapeFailure>,
}
