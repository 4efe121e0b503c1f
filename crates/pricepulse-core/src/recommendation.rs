//! Value scoring and ranking of products.

use serde::Serialize;

use crate::domain::{round_cents, Product};

/// Price band a recommendation falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationReason {
    /// Price strictly below 500.
    Value,
    /// Price in the inclusive 500..=1000 band.
    Balanced,
    /// Price strictly above 1000.
    Premium,
}

impl RecommendationReason {
    pub fn label(self) -> &'static str {
        match self {
            Self::Value => "great value for money",
            Self::Balanced => "balanced price and features",
            Self::Premium => "premium quality",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationEntry {
    pub product: Product,
    pub score: f64,
    pub reason: RecommendationReason,
}

/// Inverse-price scorer: cheaper products score higher on a 100-point floor.
pub struct RecommendationScorer;

impl RecommendationScorer {
    /// `100 + 1000 / price`, rounded to cents. Requires a positive price.
    pub fn score(price: f64) -> f64 {
        round_cents(100.0 + 1000.0 / price)
    }

    pub fn reason(price: f64) -> RecommendationReason {
        if price < 500.0 {
            RecommendationReason::Value
        } else if price > 1000.0 {
            RecommendationReason::Premium
        } else {
            RecommendationReason::Balanced
        }
    }

    /// Score and rank descending, keeping at most `limit` entries.
    ///
    /// Ties preserve the input order. Non-positive prices would blow up the
    /// inverse score, so those products are skipped with a warning.
    pub fn rank(products: Vec<Product>, limit: usize) -> Vec<RecommendationEntry> {
        let mut entries: Vec<RecommendationEntry> = products
            .into_iter()
            .filter_map(|product| {
                if product.price <= 0.0 {
                    tracing::warn!(
                        product_id = %product.id,
                        price = product.price,
                        "skipping product with non-positive price"
                    );
                    return None;
                }
                Some(RecommendationEntry {
                    score: Self::score(product.price),
                    reason: Self::reason(product.price),
                    product,
                })
            })
            .collect();

        // sort_by is stable, so equal scores keep repository order.
        entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        entries.truncate(limit);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewProduct, ProductId, UtcDateTime};

    fn product(id: u64, name: &str, price: f64) -> Product {
        let data = NewProduct::new(name, price.max(0.0), "gadgets").expect("valid product");
        Product {
            id: ProductId::new(id),
            name: data.name,
            price,
            category: data.category,
            description: String::new(),
            image_url: String::new(),
            external_id: None,
            created_at: UtcDateTime::now(),
            updated_at: None,
            price_updated_at: None,
        }
    }

    #[test]
    fn cheaper_products_score_higher() {
        assert_eq!(RecommendationScorer::score(100.0), 110.0);
        assert_eq!(RecommendationScorer::score(1000.0), 101.0);
        assert!(RecommendationScorer::score(100.0) > RecommendationScorer::score(1000.0));
    }

    #[test]
    fn reason_band_boundaries_are_balanced() {
        assert_eq!(RecommendationScorer::reason(499.99), RecommendationReason::Value);
        assert_eq!(RecommendationScorer::reason(500.0), RecommendationReason::Balanced);
        assert_eq!(RecommendationScorer::reason(1000.0), RecommendationReason::Balanced);
        assert_eq!(RecommendationScorer::reason(1000.01), RecommendationReason::Premium);
    }

    #[test]
    fn rank_is_descending_and_capped() {
        let products: Vec<Product> = (1..=12)
            .map(|i| product(i, &format!("P{i}"), 100.0 * i as f64))
            .collect();

        let ranked = RecommendationScorer::rank(products, 10);

        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].product.name, "P1");
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let products = vec![
            product(1, "First", 250.0),
            product(2, "Second", 250.0),
            product(3, "Third", 250.0),
        ];

        let ranked = RecommendationScorer::rank(products, 10);

        let names: Vec<&str> = ranked.iter().map(|e| e.product.name.as_str()).collect();
        assert_eq!(names, ["First", "Second", "Third"]);
    }

    #[test]
    fn non_positive_prices_are_skipped() {
        let products = vec![product(1, "Free", 0.0), product(2, "Paid", 200.0)];

        let ranked = RecommendationScorer::rank(products, 10);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].product.name, "Paid");
    }
}
