//! Blocking client for the VTEX catalog-search listing endpoint.
//!
//! Fail-open at two levels:
//! - a single product with an unexpected shape is logged and dropped, the
//!   rest of the batch survives;
//! - a transport or decode failure of the whole fetch is logged and yields
//!   an empty listing, so a missing scrape never aborts the sync run.

use std::time::Duration;

use serde::Deserialize;

use crate::{
    error::{SyncError, SyncResult},
    types::{cents_from_decimal, Cents},
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// One scraped listing entry, already reduced to what reconciliation needs.
#[derive(Debug, Clone)]
pub struct IncomingProduct {
    pub name: String,
    pub image: String,
    pub price_cents: Cents,
    pub list_price_cents: Cents,
    /// Carried through from the feed; the reconciler does not filter on it.
    pub unavailable: bool,
}

// Response shape of /api/catalog_system/pub/products/search/.
// Only the fields the sync uses; everything else is ignored.

#[derive(Debug, Deserialize)]
struct VtexProduct {
    #[serde(rename = "productName")]
    product_name: String,
    #[serde(default)]
    items: Vec<VtexItem>,
}

#[derive(Debug, Deserialize)]
struct VtexItem {
    #[serde(default)]
    images: Vec<VtexImage>,
    #[serde(default)]
    sellers: Vec<VtexSeller>,
}

#[derive(Debug, Deserialize)]
struct VtexImage {
    #[serde(rename = "imageUrl")]
    image_url: String,
}

#[derive(Debug, Deserialize)]
struct VtexSeller {
    #[serde(rename = "commertialOffer")]
    offer: VtexOffer,
}

#[derive(Debug, Deserialize)]
struct VtexOffer {
    #[serde(rename = "Price")]
    price: f64,
    #[serde(rename = "ListPrice")]
    list_price: f64,
    #[serde(rename = "IsAvailable", default)]
    is_available: bool,
}

pub struct JumboScraper {
    agent: ureq::Agent,
    base_url: String,
}

impl JumboScraper {
    pub fn new(base_url: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch one listing for `query`. Never fails: any fetch-level error is
    /// logged and an empty listing is returned.
    pub fn fetch_listing(&self, query: &str) -> Vec<IncomingProduct> {
        match self.fetch(query) {
            Ok(products) => products,
            Err(err) => {
                log::error!("listing fetch failed for query {query:?}: {err}");
                Vec::new()
            }
        }
    }

    fn fetch(&self, query: &str) -> SyncResult<Vec<IncomingProduct>> {
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        let endpoint = format!(
            "{}/api/catalog_system/pub/products/search/?ft={encoded}",
            self.base_url
        );
        let response = self
            .agent
            .get(&endpoint)
            .set("Accept", "application/json")
            .call()
            .map_err(|err| SyncError::Fetch(err.to_string()))?;
        let raw: Vec<serde_json::Value> = response
            .into_json()
            .map_err(|err| SyncError::Fetch(err.to_string()))?;
        Ok(map_listing(&raw))
    }
}

/// Parse a raw listing payload. Split out from the HTTP path so the field
/// mapping is testable without a network.
pub fn parse_listing(json: &str) -> SyncResult<Vec<IncomingProduct>> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(json)?;
    Ok(map_listing(&raw))
}

fn map_listing(raw: &[serde_json::Value]) -> Vec<IncomingProduct> {
    raw.iter()
        .filter_map(|value| match map_product(value) {
            Ok(product) => Some(product),
            Err(err) => {
                log::warn!("dropping malformed listing entry: {err}");
                None
            }
        })
        .collect()
}

fn map_product(value: &serde_json::Value) -> SyncResult<IncomingProduct> {
    let product: VtexProduct = serde_json::from_value(value.clone())?;
    let item = product
        .items
        .first()
        .ok_or_else(|| SyncError::Fetch(format!("{:?} has no items", product.product_name)))?;
    let image = item
        .images
        .first()
        .ok_or_else(|| SyncError::Fetch(format!("{:?} has no images", product.product_name)))?;
    let offer = &item
        .sellers
        .first()
        .ok_or_else(|| SyncError::Fetch(format!("{:?} has no sellers", product.product_name)))?
        .offer;

    Ok(IncomingProduct {
        name: product.product_name,
        image: image.image_url.clone(),
        price_cents: cents_from_decimal(offer.price),
        list_price_cents: cents_from_decimal(offer.list_price),
        unavailable: !offer.is_available,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
    [
      {
        "productName": "Coca Cola 1.5L",
        "link": "https://example.invalid/coca-cola",
        "items": [
          {
            "images": [{ "imageUrl": "img/123.jpg" }],
            "sellers": [
              { "commertialOffer": { "Price": 1200.0, "ListPrice": 1350.5, "IsAvailable": true } }
            ]
          }
        ]
      },
      {
        "productName": "Broken entry",
        "items": []
      },
      {
        "productName": "Leche Entera",
        "items": [
          {
            "images": [{ "imageUrl": "img/456.jpg" }],
            "sellers": [
              { "commertialOffer": { "Price": 980.25, "ListPrice": 980.25, "IsAvailable": false } }
            ]
          }
        ]
      }
    ]"#;

    #[test]
    fn parses_listing_shape() {
        let products = parse_listing(FIXTURE).unwrap();
        assert_eq!(products.len(), 2, "malformed entry must be dropped");

        assert_eq!(products[0].name, "Coca Cola 1.5L");
        assert_eq!(products[0].image, "img/123.jpg");
        assert_eq!(products[0].price_cents, 120_000);
        assert_eq!(products[0].list_price_cents, 135_050);
        assert!(!products[0].unavailable);

        assert_eq!(products[1].name, "Leche Entera");
        assert_eq!(products[1].price_cents, 98_025);
        assert!(products[1].unavailable);
    }

    #[test]
    fn non_array_payload_is_a_fetch_error() {
        assert!(parse_listing(r#"{"error": "rate limited"}"#).is_err());
    }
}
