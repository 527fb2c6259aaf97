// Report workbook export.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use gmvrecap_recon::model::RecapResult;

const RECONCILED_HEADERS: [&str; 13] = [
    "content_url",
    "content_id",
    "creator_handle",
    "creator_display_name",
    "play_count",
    "like_count",
    "comment_count",
    "share_count",
    "follower_count",
    "music_title",
    "scraped_at",
    "revenue_by_content",
    "revenue_by_creator",
];

const CREATOR_HEADERS: [&str; 5] = [
    "creator",
    "content_items",
    "engagement",
    "revenue",
    "sources",
];

/// Write the recap workbook: `Reconciled` (per-content rows with both revenue
/// columns), `Creators` (the rollup, already in its final sort order), and
/// `Failed` (per-URL scrape failures, only when there are any).
pub fn write_report(path: &Path, result: &RecapResult) -> Result<(), String> {
    build_workbook(result)
        .and_then(|mut workbook| workbook.save(path))
        .map_err(|e| format!("{}: {e}", path.display()))
}

fn build_workbook(result: &RecapResult) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Reconciled")?;
    write_headers(sheet, &RECONCILED_HEADERS, &header)?;
    for (i, row) in result.records.iter().enumerate() {
        let r = (i + 1) as u32;
        let record = &row.record;
        sheet.write_string(r, 0, &record.content_url)?;
        sheet.write_string(r, 1, record.content_id.as_deref().unwrap_or(""))?;
        sheet.write_string(r, 2, record.creator_handle.as_deref().unwrap_or(""))?;
        sheet.write_string(r, 3, &record.creator_display_name)?;
        sheet.write_number(r, 4, record.engagement.play as f64)?;
        sheet.write_number(r, 5, record.engagement.like as f64)?;
        sheet.write_number(r, 6, record.engagement.comment as f64)?;
        sheet.write_number(r, 7, record.engagement.share as f64)?;
        sheet.write_number(r, 8, record.follower_count as f64)?;
        sheet.write_string(r, 9, record.music_title.as_deref().unwrap_or(""))?;
        sheet.write_string(r, 10, &record.scraped_at)?;
        sheet.write_number(r, 11, row.revenue_by_content as f64)?;
        sheet.write_number(r, 12, row.revenue_by_creator as f64)?;
    }

    let sheet = workbook.add_worksheet();
    sheet.set_name("Creators")?;
    write_headers(sheet, &CREATOR_HEADERS, &header)?;
    for (i, entry) in result.rollup.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, &entry.creator)?;
        sheet.write_number(r, 1, entry.total_content_items as f64)?;
        sheet.write_number(r, 2, entry.total_engagement as f64)?;
        sheet.write_number(r, 3, entry.total_revenue as f64)?;
        sheet.write_string(r, 4, &entry.sources.join(", "))?;
    }

    if !result.failures.is_empty() {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Failed")?;
        write_headers(sheet, &["content_url", "error"], &header)?;
        for (i, failure) in result.failures.iter().enumerate() {
            let r = (i + 1) as u32;
            sheet.write_string(r, 0, &failure.content_url)?;
            sheet.write_string(r, 1, &failure.error)?;
        }
    }

    Ok(workbook)
}

fn write_headers(
    sheet: &mut Worksheet,
    headers: &[&str],
    format: &Format,
) -> Result<(), XlsxError> {
    for (col, name) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, format)?;
    }
    Ok(())
}
