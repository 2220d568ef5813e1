//! Shared primitive types used across the sync engine.

/// Catalog row identifier, as assigned by the retailer feed.
pub type CatalogId = String;

/// Feed partition tag. Within one source, ids are unique.
pub type SourceTag = String;

/// A currency amount in integer cents. Prices are compared for exact
/// equality, so they are never carried as floating point past the
/// scraper boundary.
pub type Cents = i64;

/// Convert a decimal currency amount from the feed into cents.
pub fn cents_from_decimal(amount: f64) -> Cents {
    (amount * 100.0).round() as Cents
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_to_cents() {
        assert_eq!(cents_from_decimal(1200.00), 120_000);
        assert_eq!(cents_from_decimal(0.0), 0);
        assert_eq!(cents_from_decimal(27.08), 2708);
        assert_eq!(cents_from_decimal(0.005), 1);
    }
}
