//! Run report: purely additive counters plus per-item change records.

use serde::Serialize;

use crate::types::{CatalogId, Cents};

/// One applied price change, recorded in input order.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeRecord {
    pub catalog_id: CatalogId,
    pub old_price_cents: Cents,
    pub new_price_cents: Cents,
    /// Strategy tag, e.g. "image".
    pub matched_by: String,
}

/// Aggregated outcome of one reconciliation run.
///
/// `matched` counts every product a catalog row was found for, whether or
/// not a write followed; `price_changes` counts actual writes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub matched: u64,
    pub skipped: u64,
    pub price_changes: u64,
    pub comparisons: u64,
    pub write_failures: u64,
    pub changes: Vec<ChangeRecord>,
}
