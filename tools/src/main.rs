//! sync-runner: one-shot catalog price sync.
//!
//! Usage:
//!   DATABASE_PATH=catalog.db sync-runner --query "leche"
//!   sync-runner --db catalog.db --source jumbo --json
//!
//! Exit code is non-zero only when configuration is missing or the store
//! cannot be opened; fetch failures and per-product problems are folded
//! into the printed report.

use anyhow::Result;
use pricesync_core::{reconcile, scraper::JumboScraper, store::CatalogStore, Report, SyncConfig};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let json_output = args.iter().any(|a| a == "--json");

    // CLI flags override the environment, key by key.
    let config = SyncConfig::from_lookup(|key| {
        let flag = match key {
            "DATABASE_PATH" => "--db",
            "PRICE_SOURCE" => "--source",
            "LISTING_BASE_URL" => "--base-url",
            "SEARCH_QUERY" => "--query",
            _ => return env::var(key).ok(),
        };
        flag_value(&args, flag).or_else(|| env::var(key).ok())
    })?;

    if !json_output {
        println!("pricesync — sync-runner");
        println!("  db:      {}", config.db_path);
        println!("  source:  {}", config.source);
        println!("  query:   {:?}", config.query);
        println!();
    }

    let store = CatalogStore::open(&config.db_path)?;
    store.migrate()?;

    let scraper = JumboScraper::new(&config.base_url);
    let products = scraper.fetch_listing(&config.query);
    log::info!(
        "fetched {} listing entries for source {}",
        products.len(),
        config.source
    );

    let report = reconcile(&store, &config.source, &products)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(())
}

fn print_summary(report: &Report) {
    println!("=== RUN SUMMARY ===");
    println!("  matched:        {}", report.matched);
    println!("  skipped:        {}", report.skipped);
    println!("  price changes:  {}", report.price_changes);
    println!("  comparisons:    {}", report.comparisons);
    println!("  write failures: {}", report.write_failures);

    if !report.changes.is_empty() {
        println!();
        println!("=== PRICE CHANGES ===");
        for change in &report.changes {
            println!(
                "  {} | {:.2} -> {:.2} | via {}",
                change.catalog_id,
                change.old_price_cents as f64 / 100.0,
                change.new_price_cents as f64 / 100.0,
                change.matched_by
            );
        }
    }
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].clone())
}
