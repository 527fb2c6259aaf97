// Integration tests driving the gmvr binary end to end.
// Run with: cargo test -p gmvrecap-cli --test run_tests

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::tempdir;

fn gmvr() -> Command {
    Command::new(env!("CARGO_BIN_EXE_gmvr"))
}

fn write_records(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("scraped.json");
    fs::write(
        &path,
        r#"[
  {
    "video_url": "https://www.tiktok.com/@alice/video/111",
    "video_id": "111",
    "unique_id": "alice",
    "nickname": "Alice A",
    "play_count": 1000,
    "like_count": 50
  },
  {
    "video_url": "https://www.tiktok.com/@alice/video/999",
    "video_id": "999",
    "unique_id": "alice",
    "play_count": 10
  },
  {
    "video_url": "https://www.tiktok.com/@bob/video/500",
    "error": "Missing author or stats data"
  }
]"#,
    )
    .unwrap();
    path
}

fn write_revenue_files(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let a = dir.join("campaign-a.csv");
    fs::write(
        &a,
        "Video Link,GMV,Order Status\n\
         https://www.tiktok.com/@alice/video/111,Rp500.000,Completed\n\
         https://www.tiktok.com/@bob/video/222,Rp300.000,Refunded\n",
    )
    .unwrap();

    let b = dir.join("campaign-b.csv");
    fs::write(&b, "Creator Name,GMV\nalice,200\n").unwrap();

    (a, b)
}

#[test]
fn run_reconciles_and_prints_json() {
    let dir = tempdir().unwrap();
    let records = write_records(dir.path());
    let (a, b) = write_revenue_files(dir.path());

    let output = gmvr()
        .args(["run", "--json", "--records"])
        .arg(&records)
        .arg("--revenue")
        .arg(&a)
        .arg("--revenue")
        .arg(&b)
        .output()
        .expect("failed to run gmvr");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is not JSON");

    assert_eq!(json["records"][0]["revenue_by_content"], 500_000);
    assert_eq!(json["records"][0]["revenue_by_creator"], 200);
    assert_eq!(json["records"][1]["revenue_by_content"], 0);
    assert_eq!(json["records"][1]["revenue_by_creator"], 200);
    assert_eq!(json["summary"]["scrape_failures"], 1);
    assert_eq!(json["failures"][0]["content_url"], "https://www.tiktok.com/@bob/video/500");
    assert_eq!(json["warnings"].as_array().unwrap().len(), 0);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("recap: 2 record(s)"), "stderr: {stderr}");
}

#[test]
fn run_writes_report_workbook() {
    let dir = tempdir().unwrap();
    let records = write_records(dir.path());
    let (a, _) = write_revenue_files(dir.path());
    let out = dir.path().join("recap.xlsx");

    let output = gmvr()
        .args(["run", "--records"])
        .arg(&records)
        .arg("--revenue")
        .arg(&a)
        .arg("-o")
        .arg(&out)
        .output()
        .expect("failed to run gmvr");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(out.exists(), "report workbook was not written");
}

#[test]
fn missing_amount_column_exits_with_warning_code() {
    let dir = tempdir().unwrap();
    let records = write_records(dir.path());
    let bad = dir.path().join("no-gmv.csv");
    fs::write(&bad, "Creator Name\nalice\n").unwrap();

    let output = gmvr()
        .args(["run", "--json", "--records"])
        .arg(&records)
        .arg("--revenue")
        .arg(&bad)
        .output()
        .expect("failed to run gmvr");

    assert_eq!(output.status.code(), Some(6), "expected warning exit code");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no amount column"), "stderr: {stderr}");

    // JSON is still produced; revenue is all zero rather than missing.
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is not JSON");
    assert_eq!(json["records"][0]["revenue_by_content"], 0);
}

#[test]
fn sort_flags_change_rollup_order() {
    let dir = tempdir().unwrap();
    let records = write_records(dir.path());
    let (a, b) = write_revenue_files(dir.path());

    let output = gmvr()
        .args(["run", "--json", "--sort", "content-count", "--ascending", "--records"])
        .arg(&records)
        .arg("--revenue")
        .arg(&a)
        .arg("--revenue")
        .arg(&b)
        .output()
        .expect("failed to run gmvr");

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["meta"]["sort_key"], "content_count");
    assert_eq!(json["meta"]["ascending"], true);
}

#[test]
fn watchlist_misses_are_reported() {
    let dir = tempdir().unwrap();
    let records = write_records(dir.path());
    let (a, b) = write_revenue_files(dir.path());
    let watchlist = dir.path().join("names.txt");
    fs::write(&watchlist, "alice\nmallory\n\n").unwrap();

    let output = gmvr()
        .args(["run", "--json", "--records"])
        .arg(&records)
        .arg("--revenue")
        .arg(&a)
        .arg("--revenue")
        .arg(&b)
        .arg("--watchlist")
        .arg(&watchlist)
        .output()
        .expect("failed to run gmvr");

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["watchlist_missing"][0], "mallory");
    assert_eq!(json["rollup"].as_array().unwrap().len(), 1);
    assert_eq!(json["rollup"][0]["creator"], "alice");
}

#[test]
fn inspect_shows_resolved_roles() {
    let dir = tempdir().unwrap();
    let (a, _) = write_revenue_files(dir.path());

    let output = gmvr()
        .arg("inspect")
        .arg(&a)
        .output()
        .expect("failed to run gmvr");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("'GMV'"), "stdout: {stdout}");
    assert!(stdout.contains("'Video Link'"), "stdout: {stdout}");
    assert!(stdout.contains("1 refunded"), "stdout: {stdout}");
}

#[test]
fn inspect_without_amount_column_fails_with_hint() {
    let dir = tempdir().unwrap();
    let bad = dir.path().join("no-gmv.csv");
    fs::write(&bad, "Creator Name\nalice\n").unwrap();

    let output = gmvr()
        .arg("inspect")
        .arg(&bad)
        .output()
        .expect("failed to run gmvr");

    assert_eq!(output.status.code(), Some(6));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no amount column"), "stderr: {stderr}");
    assert!(stderr.contains("hint:"), "stderr: {stderr}");
}

#[test]
fn unreadable_records_file_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let bogus = dir.path().join("scraped.json");
    fs::write(&bogus, "{not json").unwrap();

    let output = gmvr()
        .args(["run", "--records"])
        .arg(&bogus)
        .output()
        .expect("failed to run gmvr");

    assert_eq!(output.status.code(), Some(4));
}
