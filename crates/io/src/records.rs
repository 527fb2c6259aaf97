// Scraper artifact ingestion.
//
// The scraping collaborator hands over one record per requested URL; a record
// with a non-empty `error` has no other populated fields and is reported
// separately, never reconciled. Two artifact shapes are accepted: a JSON
// array of records, or the scraper's workbook with `Success`/`Failed` sheets.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use serde::{Deserialize, Deserializer};

use gmvrecap_recon::ident;
use gmvrecap_recon::model::{ContentRecord, EngagementCounts, ScrapeFailure};

pub fn load_records(path: &Path) -> Result<(Vec<ContentRecord>, Vec<ScrapeFailure>), String> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("xlsx") | Some("xlsm") | Some("xls") => load_workbook(path),
        _ => load_json(path),
    }
}

// ── JSON artifact ───────────────────────────────────────────────────

/// One record as the scraper writes it. Field names follow the scraper's
/// output; aliases accept the canonical names too. Identifiers and counters
/// arrive as strings or numbers depending on the scraper version, so both
/// are tolerated.
#[derive(Debug, Deserialize)]
struct WireRecord {
    #[serde(alias = "video_url")]
    content_url: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default, alias = "video_id", deserialize_with = "string_or_number")]
    content_id: Option<String>,
    #[serde(default, alias = "unique_id")]
    creator_handle: Option<String>,
    #[serde(default, alias = "nickname")]
    creator_display_name: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    play_count: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    like_count: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    comment_count: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    share_count: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    follower_count: u64,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    create_time: Option<i64>,
    #[serde(default)]
    music_title: Option<String>,
    #[serde(default)]
    scraped_at: String,
}

fn load_json(path: &Path) -> Result<(Vec<ContentRecord>, Vec<ScrapeFailure>), String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let wire: Vec<WireRecord> =
        serde_json::from_str(&content).map_err(|e| format!("{}: {e}", path.display()))?;
    Ok(split(wire))
}

fn split(wire: Vec<WireRecord>) -> (Vec<ContentRecord>, Vec<ScrapeFailure>) {
    let mut records = Vec::new();
    let mut failures = Vec::new();

    for w in wire {
        match w.error.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            Some(error) => failures.push(ScrapeFailure {
                content_url: w.content_url,
                error: error.to_string(),
            }),
            None => {
                // The scraper usually supplies the id; the URL is the backup.
                let content_id = w
                    .content_id
                    .or_else(|| ident::extract(&w.content_url));
                records.push(ContentRecord {
                    content_id,
                    creator_handle: w.creator_handle,
                    creator_display_name: w.creator_display_name,
                    engagement: EngagementCounts {
                        play: w.play_count,
                        like: w.like_count,
                        comment: w.comment_count,
                        share: w.share_count,
                    },
                    follower_count: w.follower_count,
                    create_time: w.create_time,
                    music_title: w.music_title,
                    scraped_at: w.scraped_at,
                    content_url: w.content_url,
                });
            }
        }
    }

    (records, failures)
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => {
            let s = s.trim().to_string();
            (!s.is_empty()).then_some(s)
        }
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

fn lenient_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

// ── Workbook artifact ───────────────────────────────────────────────

fn load_workbook(path: &Path) -> Result<(Vec<ContentRecord>, Vec<ScrapeFailure>), String> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let sheets = workbook.sheet_names().to_vec();

    let mut records = Vec::new();
    if sheets.iter().any(|s| s == "Success") {
        let range = workbook
            .worksheet_range("Success")
            .map_err(|e| format!("{}: {e}", path.display()))?;
        let sheet = Sheet::from_range(&range);
        for row in sheet.rows() {
            let Some(content_url) = row.text("video_url") else {
                continue;
            };
            let content_id = row
                .text("video_id")
                .or_else(|| ident::extract(&content_url));
            records.push(ContentRecord {
                content_id,
                creator_handle: row.text("unique_id"),
                creator_display_name: row.text("nickname").unwrap_or_default(),
                engagement: EngagementCounts {
                    play: row.count("play_count"),
                    like: row.count("like_count"),
                    comment: row.count("comment_count"),
                    share: row.count("share_count"),
                },
                follower_count: row.count("follower_count"),
                create_time: row.integer("create_time"),
                music_title: row.text("music_title"),
                scraped_at: row.text("scraped_at").unwrap_or_default(),
                content_url,
            });
        }
    }

    let mut failures = Vec::new();
    if sheets.iter().any(|s| s == "Failed") {
        let range = workbook
            .worksheet_range("Failed")
            .map_err(|e| format!("{}: {e}", path.display()))?;
        let sheet = Sheet::from_range(&range);
        for row in sheet.rows() {
            let Some(content_url) = row.text("video_url") else {
                continue;
            };
            failures.push(ScrapeFailure {
                content_url,
                error: row.text("error").unwrap_or_default(),
            });
        }
    }

    Ok((records, failures))
}

/// Header-addressed row access over a calamine range.
struct Sheet {
    headers: Vec<String>,
    rows: Vec<Vec<Data>>,
}

struct SheetRow<'a> {
    headers: &'a [String],
    cells: &'a [Data],
}

impl Sheet {
    fn from_range(range: &calamine::Range<Data>) -> Sheet {
        let mut iter = range.rows();
        let headers: Vec<String> = match iter.next() {
            Some(row) => row
                .iter()
                .map(|d| d.to_string().trim().to_lowercase())
                .collect(),
            None => Vec::new(),
        };
        Sheet {
            headers,
            rows: iter.map(|row| row.to_vec()).collect(),
        }
    }

    fn rows(&self) -> impl Iterator<Item = SheetRow<'_>> {
        self.rows.iter().map(|cells| SheetRow {
            headers: &self.headers,
            cells,
        })
    }
}

impl SheetRow<'_> {
    fn cell(&self, name: &str) -> Option<&Data> {
        let idx = self.headers.iter().position(|h| h == name)?;
        self.cells.get(idx)
    }

    fn text(&self, name: &str) -> Option<String> {
        let value = match self.cell(name)? {
            Data::String(s) => s.trim().to_string(),
            Data::Int(v) => v.to_string(),
            Data::Float(v) => {
                // Excel round-trips long numeric ids as floats.
                if v.fract() == 0.0 {
                    format!("{:.0}", v)
                } else {
                    v.to_string()
                }
            }
            Data::Empty => return None,
            other => other.to_string(),
        };
        (!value.is_empty()).then_some(value)
    }

    fn count(&self, name: &str) -> u64 {
        match self.cell(name) {
            Some(Data::Int(v)) => (*v).max(0) as u64,
            Some(Data::Float(v)) => {
                if *v >= 0.0 {
                    v.trunc() as u64
                } else {
                    0
                }
            }
            Some(Data::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    fn integer(&self, name: &str) -> Option<i64> {
        match self.cell(name)? {
            Data::Int(v) => Some(*v),
            Data::Float(v) => Some(v.trunc() as i64),
            Data::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}
