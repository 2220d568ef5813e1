//! Per-product reconciliation drive loop.
//!
//! Each product is processed independently, in input order, with fresh
//! store queries — an update applied for one product cannot influence the
//! match decision for another beyond ordinary read-your-writes.
//!
//! Failure policy: only configuration/store-open problems abort a run
//! (upstream of this module). Here, a store error while matching or
//! writing is logged, attributed to a counter, and the loop continues so
//! a partial run still yields a usable report.

use crate::{
    error::SyncResult,
    matcher::{self, MatchStrategy},
    report::{ChangeRecord, Report},
    scraper::IncomingProduct,
    store::CatalogWriter,
};

/// Reconcile one scraped listing against the catalog for `source`.
pub fn reconcile(
    store: &impl CatalogWriter,
    source: &str,
    products: &[IncomingProduct],
) -> SyncResult<Report> {
    let mut report = Report::default();

    for product in products {
        let matched = match matcher::match_product(store, source, product) {
            Ok(m) => m,
            Err(err) => {
                log::error!("match failed | {} | {err}", product.name);
                report.skipped += 1;
                continue;
            }
        };
        report.comparisons += matched.comparisons;

        let Some(row) = matched.row else {
            log::info!("no match | {}", product.name);
            report.skipped += 1;
            continue;
        };

        debug_assert_ne!(matched.strategy, MatchStrategy::None);
        report.matched += 1;

        if row.price_cents == product.price_cents {
            // Idempotence: unchanged upstream price, no write.
            log::debug!("unchanged | {}", row.name);
            continue;
        }

        match store.update_price(&row.id, source, product.price_cents, product.list_price_cents) {
            Ok(()) => {
                log::info!(
                    "update | {} | {} -> {} | via {}",
                    row.name,
                    row.price_cents,
                    product.price_cents,
                    matched.strategy
                );
                report.changes.push(ChangeRecord {
                    catalog_id: row.id.clone(),
                    old_price_cents: row.price_cents,
                    new_price_cents: product.price_cents,
                    matched_by: matched.strategy.to_string(),
                });
                report.price_changes += 1;
            }
            Err(err) => {
                log::warn!("price write failed | {} ({}) | {err}", row.name, row.id);
                report.write_failures += 1;
            }
        }
    }

    Ok(report)
}
