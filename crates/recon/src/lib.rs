//! `gmvrecap-recon` — creator revenue reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded revenue tables and scraped content
//! records, returns reconciled results. No CLI or IO dependencies.

pub mod clean;
pub mod columns;
pub mod config;
pub mod engine;
pub mod error;
pub mod ident;
pub mod index;
pub mod ledger;
pub mod model;
pub mod money;
pub mod rollup;

pub use config::RecapConfig;
pub use engine::{reconcile, run};
pub use error::ReconError;
pub use index::MatchIndex;
pub use model::{Cell, ContentRecord, RawTable, RecapResult, ScrapeFailure};
