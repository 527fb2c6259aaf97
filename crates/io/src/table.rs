// Revenue export import: CSV/TSV with delimiter sniffing, XLSX via calamine.

use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use gmvrecap_recon::model::{Cell, RawTable};

/// Load one revenue export. Format is chosen by extension: `.xlsx`/`.xlsm`/
/// `.xls` go through calamine, everything else is treated as delimited text.
/// The first row is the header; column meaning is discovered later by the
/// engine, never here.
pub fn load_table(path: &Path) -> Result<RawTable, String> {
    let source_file = file_label(path);
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("xlsx") | Some("xlsm") | Some("xls") => load_xlsx(path, source_file),
        _ => load_delimited(path, source_file),
    }
}

/// The file name alone is the provenance label; users recognize upload names,
/// not absolute paths.
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ── Delimited text ──────────────────────────────────────────────────

fn load_delimited(path: &Path, source_file: String) -> Result<RawTable, String> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let header = match records.next() {
        Some(record) => record.map_err(|e| format!("{source_file}: {e}"))?,
        None => return Err(format!("{source_file}: file is empty")),
    };
    let columns: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|e| format!("{source_file}: {e}"))?;
        let mut cells: Vec<Cell> = record.iter().map(text_cell).collect();
        cells.resize(columns.len(), Cell::Empty);
        if cells.iter().all(Cell::is_empty) {
            continue;
        }
        rows.push(cells);
    }

    Ok(RawTable {
        source_file,
        columns,
        rows,
    })
}

/// Coerce a text field to the narrowest cell type, the way a spreadsheet
/// import would.
fn text_cell(field: &str) -> Cell {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Cell::Empty;
    }
    if let Ok(v) = trimmed.parse::<i64>() {
        return Cell::Int(v);
    }
    if let Ok(v) = trimmed.parse::<f64>() {
        return Cell::Float(v);
    }
    Cell::Text(field.to_string())
}

/// Read file and convert to UTF-8 if needed (Excel-exported CSVs are often
/// Windows-1252).
fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file =
        std::fs::File::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| format!("{}: {e}", path.display()))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Pick the delimiter that yields the most consistent multi-field split
/// across the first few lines. Field counts come from the csv parser itself
/// so quoted fields containing other candidates don't skew the score.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b',', b';', b'\t', b'|'];
    let sample: Vec<&str> = content.lines().take(10).collect();
    if sample.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        let target = counts[0];
        if target <= 1 {
            continue;
        }
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

// ── XLSX ────────────────────────────────────────────────────────────

fn load_xlsx(path: &Path, source_file: String) -> Result<RawTable, String> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| format!("{source_file}: {e}"))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| format!("{source_file}: workbook has no sheets"))?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| format!("{source_file}: {e}"))?;

    let mut rows_iter = range.rows();
    let header = rows_iter
        .next()
        .ok_or_else(|| format!("{source_file}: sheet '{sheet}' is empty"))?;
    let columns: Vec<String> = header.iter().map(|d| data_cell(d).display()).collect();

    let mut rows = Vec::new();
    for row in rows_iter {
        let mut cells: Vec<Cell> = row.iter().map(data_cell).collect();
        cells.resize(columns.len(), Cell::Empty);
        if cells.iter().all(Cell::is_empty) {
            continue;
        }
        rows.push(cells);
    }

    Ok(RawTable {
        source_file,
        columns,
        rows,
    })
}

fn data_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(v) => Cell::Int(*v),
        Data::Float(v) => Cell::Float(*v),
        Data::String(s) => {
            if s.trim().is_empty() {
                Cell::Empty
            } else {
                Cell::Text(s.clone())
            }
        }
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => Cell::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}
