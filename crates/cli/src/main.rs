// gmvrecap CLI - headless creator GMV recap runs

mod exit_codes;
mod recap;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use exit_codes::{EXIT_ERROR, EXIT_IO, EXIT_PARSE, EXIT_SUCCESS};
use gmvrecap_recon::config::{EngagementCounter, RevenueField, SortKey};

#[derive(Parser)]
#[command(name = "gmvr")]
#[command(about = "Reconcile scraped creator content with revenue exports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a recap: load scraped records and revenue files, reconcile, report
    #[command(after_help = "\
Examples:
  gmvr run --records scraped.json --revenue campaign-a.xlsx --revenue campaign-b.csv -o recap.xlsx
  gmvr run --records scraped_tiktok.xlsx --revenue orders.csv --json
  gmvr run --records scraped.json --revenue orders.csv --sort engagement --ascending
  gmvr run --records scraped.json --revenue orders.csv --config recap.toml --watchlist names.txt")]
    Run {
        /// Scraper output: JSON array, or workbook with Success/Failed sheets
        #[arg(long)]
        records: PathBuf,

        /// Revenue export file (CSV/TSV/XLSX); repeatable
        #[arg(long = "revenue", value_name = "FILE")]
        revenue: Vec<PathBuf>,

        /// TOML config file (flags below override it)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the report workbook here
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,

        /// Print the full result as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Rollup sort key
        #[arg(long)]
        sort: Option<SortKeyArg>,

        /// Sort ascending (default: descending)
        #[arg(long)]
        ascending: bool,

        /// Which revenue column feeds the rollup
        #[arg(long)]
        revenue_field: Option<RevenueFieldArg>,

        /// Engagement counter summed in the rollup
        #[arg(long)]
        counter: Option<CounterArg>,

        /// Newline-separated creator watchlist file (replaces the config list)
        #[arg(long)]
        watchlist: Option<PathBuf>,

        /// Suppress progress on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Probe a revenue file: resolved columns and row counts, without running
    #[command(after_help = "\
Examples:
  gmvr inspect campaign-a.xlsx
  gmvr inspect orders.csv --config recap.toml")]
    Inspect {
        /// Revenue export to probe
        file: PathBuf,

        /// TOML config file (column overrides apply)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortKeyArg {
    Revenue,
    Engagement,
    ContentCount,
}

impl From<SortKeyArg> for SortKey {
    fn from(arg: SortKeyArg) -> Self {
        match arg {
            SortKeyArg::Revenue => SortKey::Revenue,
            SortKeyArg::Engagement => SortKey::Engagement,
            SortKeyArg::ContentCount => SortKey::ContentCount,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum RevenueFieldArg {
    Content,
    Creator,
}

impl From<RevenueFieldArg> for RevenueField {
    fn from(arg: RevenueFieldArg) -> Self {
        match arg {
            RevenueFieldArg::Content => RevenueField::ByContent,
            RevenueFieldArg::Creator => RevenueField::ByCreator,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CounterArg {
    Play,
    Like,
    Comment,
    Share,
}

impl From<CounterArg> for EngagementCounter {
    fn from(arg: CounterArg) -> Self {
        match arg {
            CounterArg::Play => EngagementCounter::Play,
            CounterArg::Like => EngagementCounter::Like,
            CounterArg::Comment => EngagementCounter::Comment,
            CounterArg::Share => EngagementCounter::Share,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            records,
            revenue,
            config,
            out,
            json,
            sort,
            ascending,
            revenue_field,
            counter,
            watchlist,
            quiet,
        } => recap::cmd_run(recap::RunArgs {
            records,
            revenue,
            config,
            out,
            json,
            sort: sort.map(Into::into),
            ascending,
            revenue_field: revenue_field.map(Into::into),
            counter: counter.map(Into::into),
            watchlist,
            quiet,
        }),
        Commands::Inspect { file, config } => recap::cmd_inspect(file, config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }
}
