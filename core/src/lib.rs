//! `pricesync-core` — catalog price reconciliation engine.
//!
//! Matches scraped retailer listings against the persisted product catalog
//! and applies confident price updates. Process-level concerns (env, CLI,
//! exit codes) live in the `sync-runner` binary under `tools/`.

pub mod config;
pub mod error;
pub mod matcher;
pub mod normalizer;
pub mod reconciler;
pub mod report;
pub mod scraper;
pub mod store;
pub mod types;

pub use config::SyncConfig;
pub use error::{SyncError, SyncResult};
pub use reconciler::reconcile;
pub use report::Report;
