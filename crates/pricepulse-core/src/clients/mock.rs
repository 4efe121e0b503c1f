//! Deterministic offline sources for demos and CLI mock mode.

use super::{CatalogSource, HealthProbe, PriceSource, SourceFuture};
use crate::domain::{ExternalProductRecord, ProductId, Quote};

/// Catalog source returning a fixed snapshot.
#[derive(Debug, Default)]
pub struct MockCatalogSource;

impl CatalogSource for MockCatalogSource {
    fn fetch_catalog<'a>(&'a self) -> SourceFuture<'a, Vec<ExternalProductRecord>> {
        Box::pin(async move {
            Ok(vec![
                ExternalProductRecord {
                    name: String::from("Pixel 9"),
                    price: 799.0,
                    category: String::from("smartphones"),
                    description: String::from("Google flagship smartphone"),
                    image_url: String::from("https://example.com/images/pixel-9.jpg"),
                    external_id: String::from("mock_101"),
                },
                ExternalProductRecord {
                    name: String::from("ThinkPad X1 Carbon"),
                    price: 1349.0,
                    category: String::from("laptops"),
                    description: String::from("Lenovo business ultrabook"),
                    image_url: String::from("https://example.com/images/thinkpad-x1.jpg"),
                    external_id: String::from("mock_102"),
                },
                ExternalProductRecord {
                    name: String::from("Galaxy Buds 3"),
                    price: 179.0,
                    category: String::from("audio"),
                    description: String::from("Samsung wireless earbuds"),
                    image_url: String::from("https://example.com/images/buds-3.jpg"),
                    external_id: String::from("mock_103"),
                },
            ])
        })
    }
}

/// Price source deriving stable per-product quotes from the product id.
#[derive(Debug, Default)]
pub struct MockPriceSource;

impl PriceSource for MockPriceSource {
    fn fetch_quotes<'a>(&'a self, product_id: ProductId) -> SourceFuture<'a, Vec<Quote>> {
        Box::pin(async move {
            let seed = product_id.value();
            let base = 50.0 + (seed.wrapping_mul(37) % 1_000) as f64 / 10.0;
            Ok(vec![
                Quote {
                    source: String::from("RetailerA"),
                    price: base,
                    url: format!("https://retailera.test/products/{product_id}"),
                    in_stock: true,
                },
                Quote {
                    source: String::from("RetailerB"),
                    price: base + 12.5,
                    url: format!("https://retailerb.test/products/{product_id}"),
                    in_stock: seed % 4 != 0,
                },
            ])
        })
    }
}

/// Probe reporting every upstream as reachable with a fixed latency.
#[derive(Debug, Default)]
pub struct MockHealthProbe;

impl HealthProbe for MockHealthProbe {
    fn ping<'a>(&'a self, _base_url: &'a str) -> SourceFuture<'a, u64> {
        Box::pin(async move { Ok(12) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_quotes_are_deterministic_per_product() {
        let source = MockPriceSource;
        let first = source.fetch_quotes(ProductId::new(7)).await.expect("quotes");
        let second = source.fetch_quotes(ProductId::new(7)).await.expect("quotes");
        assert_eq!(first, second);

        let other = source.fetch_quotes(ProductId::new(8)).await.expect("quotes");
        assert_ne!(first[0].price, other[0].price);
    }
}
