//! Runtime configuration for one sync cycle.
//!
//! Everything comes from the environment (the runner may substitute CLI
//! flags through [`SyncConfig::from_lookup`]). Only the store path is
//! mandatory: a missing store target is the one fatal, pre-run error.

use crate::error::{SyncError, SyncResult};

const DEFAULT_SOURCE: &str = "jumbo";
const DEFAULT_BASE_URL: &str = "https://www.jumbo.com.ar";

#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Path to the SQLite catalog database. Required.
    pub db_path: String,
    /// Source tag the run is scoped to; catalog rows from other sources
    /// are never read or written.
    pub source: String,
    /// Base URL of the VTEX storefront to scrape.
    pub base_url: String,
    /// Free-text search term passed to the listing endpoint. Empty means
    /// "everything the endpoint returns for an empty search".
    pub query: String,
}

impl SyncConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> SyncResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. `DATABASE_PATH`
    /// is required and must be non-blank; the rest fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SyncResult<Self> {
        let db_path = lookup("DATABASE_PATH")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| SyncError::Config("DATABASE_PATH is not set".into()))?;

        Ok(Self {
            db_path,
            source: lookup("PRICE_SOURCE").unwrap_or_else(|| DEFAULT_SOURCE.into()),
            base_url: lookup("LISTING_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            query: lookup("SEARCH_QUERY").unwrap_or_default(),
        })
    }
}
