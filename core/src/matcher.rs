//! Multi-strategy product matching.
//!
//! Strategies are tried in a fixed order and the first hit wins:
//!   1. image-exact — authoritative, image URLs are unique-enough per SKU
//!   2. normalized-name-exact
//!   3. progressive token-dropping prefix search, where a candidate is only
//!      accepted after an exact image comparison (the confirmation gate)
//!
//! "No match" is an expected outcome, not an error; only store failures
//! surface as `Err`.

use serde::Serialize;

use crate::{
    error::SyncResult,
    normalizer::normalize,
    scraper::IncomingProduct,
    store::{CatalogReader, CatalogRow},
};

/// Which strategy produced the match, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    Image,
    NameExact,
    Prefix,
    None,
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::NameExact => write!(f, "name_exact"),
            Self::Prefix => write!(f, "prefix"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Outcome of matching one incoming product.
#[derive(Debug)]
pub struct Match {
    pub row: Option<CatalogRow>,
    pub strategy: MatchStrategy,
    /// Image-equality checks performed by the prefix strategy.
    pub comparisons: u64,
}

impl Match {
    fn miss(comparisons: u64) -> Self {
        Self {
            row: None,
            strategy: MatchStrategy::None,
            comparisons,
        }
    }
}

/// Resolve at most one catalog row for an incoming product. Read-only.
pub fn match_product(
    store: &impl CatalogReader,
    source: &str,
    product: &IncomingProduct,
) -> SyncResult<Match> {
    if let Some(row) = by_image(store, source, product)? {
        return Ok(Match {
            row: Some(row),
            strategy: MatchStrategy::Image,
            comparisons: 0,
        });
    }
    if let Some(row) = by_name_exact(store, source, product)? {
        return Ok(Match {
            row: Some(row),
            strategy: MatchStrategy::NameExact,
            comparisons: 0,
        });
    }
    by_prefix(store, source, product)
}

fn by_image(
    store: &impl CatalogReader,
    source: &str,
    product: &IncomingProduct,
) -> SyncResult<Option<CatalogRow>> {
    Ok(store
        .find_by_image(source, &product.image)?
        .into_iter()
        .next())
}

fn by_name_exact(
    store: &impl CatalogReader,
    source: &str,
    product: &IncomingProduct,
) -> SyncResult<Option<CatalogRow>> {
    let normalized = normalize(&product.name);
    if normalized.is_empty() {
        return Ok(None);
    }
    Ok(store
        .find_by_normalized_name(source, &normalized)?
        .into_iter()
        .next())
}

fn by_prefix(
    store: &impl CatalogReader,
    source: &str,
    product: &IncomingProduct,
) -> SyncResult<Match> {
    let normalized = normalize(&product.name);
    if normalized.is_empty() {
        return Ok(Match::miss(0));
    }
    let tokens: Vec<&str> = normalized.split('+').collect();
    let mut comparisons = 0u64;

    // Shrink the prefix one token at a time. The image check keeps loose
    // text prefixes ("leche" matches half the dairy aisle) from producing
    // a wrong row; termination: the slice bound reaches zero.
    for len in (1..=tokens.len()).rev() {
        let pattern = format!("{}%", tokens[..len].join("+"));
        for row in store.find_by_name_prefix(source, &pattern)? {
            comparisons += 1;
            if row.image == product.image {
                return Ok(Match {
                    row: Some(row),
                    strategy: MatchStrategy::Prefix,
                    comparisons,
                });
            }
        }
    }

    Ok(Match::miss(comparisons))
}
