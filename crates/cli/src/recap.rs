//! `gmvr run` / `gmvr inspect` — recap pipeline driving and file probing.

use std::fs;
use std::path::{Path, PathBuf};

use gmvrecap_io::{records, report, table};
use gmvrecap_recon::columns::{self, ResolvedColumn};
use gmvrecap_recon::config::{EngagementCounter, RevenueField, SortKey};
use gmvrecap_recon::{clean, RecapConfig};

use crate::exit_codes::{EXIT_INVALID_CONFIG, EXIT_RECAP_WARNINGS};
use crate::CliError;

pub struct RunArgs {
    pub records: PathBuf,
    pub revenue: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub json: bool,
    pub sort: Option<SortKey>,
    pub ascending: bool,
    pub revenue_field: Option<RevenueField>,
    pub counter: Option<EngagementCounter>,
    pub watchlist: Option<PathBuf>,
    pub quiet: bool,
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let mut config = load_config(args.config.as_deref())?;

    // Flags override the config file.
    if let Some(key) = args.sort {
        config.sort.key = key;
    }
    if args.ascending {
        config.sort.ascending = true;
    }
    if let Some(field) = args.revenue_field {
        config.revenue_field = field;
    }
    if let Some(counter) = args.counter {
        config.engagement_counter = counter;
    }
    if let Some(path) = &args.watchlist {
        config.watchlist = read_watchlist(path)?;
    }

    let (scraped, failures) =
        records::load_records(&args.records).map_err(CliError::parse)?;
    if !args.quiet {
        eprintln!(
            "loaded {} record(s), {} failure(s) from {}",
            scraped.len(),
            failures.len(),
            args.records.display(),
        );
    }

    let mut tables = Vec::with_capacity(args.revenue.len());
    for path in &args.revenue {
        let loaded = table::load_table(path).map_err(CliError::parse)?;
        if !args.quiet {
            eprintln!("loaded {}: {} row(s)", loaded.source_file, loaded.rows.len());
        }
        tables.push(loaded);
    }

    let result = gmvrecap_recon::run(&config, &tables, &scraped, &failures);

    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }
    if !result.watchlist_missing.is_empty() {
        eprintln!(
            "warning: {} watchlist name(s) not found in the data: {}",
            result.watchlist_missing.len(),
            result.watchlist_missing.join(", "),
        );
    }

    if let Some(path) = &args.out {
        report::write_report(path, &result).map_err(CliError::io)?;
        eprintln!("wrote {}", path.display());
    }

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json}");
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "recap: {} record(s) — {} matched by content, {} matched by creator, {} creator(s); \
         ledger {} row(s) from {} file(s)",
        s.scraped_records,
        s.matched_by_content,
        s.matched_by_creator,
        s.creators,
        s.ledger_rows,
        s.files_loaded,
    );

    if !result.warnings.is_empty() {
        return Err(CliError {
            code: EXIT_RECAP_WARNINGS,
            message: format!("completed with {} warning(s)", result.warnings.len()),
            hint: None,
        });
    }

    Ok(())
}

pub fn cmd_inspect(file: PathBuf, config_path: Option<PathBuf>) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref())?;
    let raw = table::load_table(&file).map_err(CliError::parse)?;
    let roles = columns::resolve_with_overrides(&raw.columns, &config.columns);

    println!(
        "{}: {} row(s), {} column(s)",
        raw.source_file,
        raw.rows.len(),
        raw.columns.len(),
    );
    print_role("amount", &roles.amount);
    print_role("refunded_amount", &roles.refunded_amount);
    print_role("status", &roles.status);
    print_role("content_link", &roles.content_link);
    print_role("creator_key", &roles.creator_key);

    match clean::clean(&raw, &roles) {
        Ok(cleaned) => {
            if !cleaned.stats.dropped_columns.is_empty() {
                println!(
                    "  dropped column(s): {}",
                    cleaned.stats.dropped_columns.join(", "),
                );
            }
            println!(
                "  kept {} row(s) ({} refunded, {} malformed, {} negative)",
                cleaned.rows.len(),
                cleaned.stats.refunded_rows,
                cleaned.stats.malformed_rows,
                cleaned.stats.negative_rows,
            );
            Ok(())
        }
        Err(e) => Err(CliError {
            code: EXIT_RECAP_WARNINGS,
            message: e.to_string(),
            hint: Some("pass the column name via [columns] in a config file".into()),
        }),
    }
}

fn print_role(name: &str, role: &Option<ResolvedColumn>) {
    match role {
        Some(c) => println!("  {:<16} '{}' (column {})", format!("{name}:"), c.name, c.index + 1),
        None => println!("  {:<16} (none)", format!("{name}:")),
    }
}

fn load_config(path: Option<&Path>) -> Result<RecapConfig, CliError> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .map_err(|e| CliError::io(format!("cannot read {}: {e}", path.display())))?;
            RecapConfig::from_toml(&content).map_err(|e| CliError {
                code: EXIT_INVALID_CONFIG,
                message: e.to_string(),
                hint: None,
            })
        }
        None => Ok(RecapConfig::default()),
    }
}

fn read_watchlist(path: &Path) -> Result<Vec<String>, CliError> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read {}: {e}", path.display())))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}
