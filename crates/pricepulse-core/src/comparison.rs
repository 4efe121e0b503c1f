//! Multi-product comparison and per-product price aggregation.

use std::sync::Arc;

use serde::Serialize;

use crate::clients::PriceSource;
use crate::domain::{round_cents, Product, ProductFilters, ProductId, Quote};
use crate::error::{ComparisonError, SourceErrorKind};
use crate::recommendation::{RecommendationEntry, RecommendationScorer};
use crate::repository::ProductRepository;

const MAX_RECOMMENDATIONS: usize = 10;

/// Products sharing one category, in first-seen category order.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub products: Vec<Product>,
}

/// Statistics over a set of at least two products.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    pub products: Vec<Product>,
    pub cheapest: Product,
    pub most_expensive: Product,
    pub average_price: f64,
    pub price_range: f64,
    pub savings: f64,
    pub categories: Vec<CategoryGroup>,
    /// Requested ids that did not resolve to a product.
    pub skipped_ids: Vec<ProductId>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// One product's internal price merged with all external quotes.
#[derive(Debug, Clone, Serialize)]
pub struct PriceComparison {
    pub product: Product,
    /// All observed quotes, the internal one always first.
    pub quotes: Vec<Quote>,
    pub best_price: Quote,
    pub savings: f64,
    pub avg_price: f64,
    pub price_range: PriceRange,
    /// Degraded-mode markers, e.g. when external price data is unavailable.
    pub warnings: Vec<String>,
}

/// Merges repository state with external quotes into comparison statistics.
pub struct ComparisonEngine {
    repo: Arc<dyn ProductRepository>,
    prices: Arc<dyn PriceSource>,
    internal_source: String,
}

impl ComparisonEngine {
    pub fn new(repo: Arc<dyn ProductRepository>, prices: Arc<dyn PriceSource>) -> Self {
        Self {
            repo,
            prices,
            internal_source: String::from("pricepulse"),
        }
    }

    /// Label attached to the internal quote in price comparisons.
    pub fn with_internal_source(mut self, label: impl Into<String>) -> Self {
        self.internal_source = label.into();
        self
    }

    /// Compare at least two resolvable products.
    ///
    /// Unresolved ids are dropped from the comparison but surfaced in
    /// `skipped_ids` so callers can tell the response was partial.
    pub fn compare_products(&self, ids: &[ProductId]) -> Result<ComparisonResult, ComparisonError> {
        let mut products = Vec::with_capacity(ids.len());
        let mut skipped_ids = Vec::new();

        for &id in ids {
            match self.repo.get_by_id(id) {
                Some(product) => products.push(product),
                None => skipped_ids.push(id),
            }
        }

        if products.len() < 2 {
            return Err(ComparisonError::InsufficientProducts {
                found: products.len(),
            });
        }

        // Strict comparisons: the first minimal/maximal product in iteration
        // order wins ties.
        let mut cheapest = &products[0];
        let mut most_expensive = &products[0];
        let mut total = 0.0;
        for product in &products {
            if product.price < cheapest.price {
                cheapest = product;
            }
            if product.price > most_expensive.price {
                most_expensive = product;
            }
            total += product.price;
        }

        let average_price = round_cents(total / products.len() as f64);
        let price_range = most_expensive.price - cheapest.price;

        let mut categories: Vec<CategoryGroup> = Vec::new();
        for product in &products {
            match categories
                .iter_mut()
                .find(|group| group.category == product.category)
            {
                Some(group) => group.products.push(product.clone()),
                None => categories.push(CategoryGroup {
                    category: product.category.clone(),
                    products: vec![product.clone()],
                }),
            }
        }

        Ok(ComparisonResult {
            cheapest: cheapest.clone(),
            most_expensive: most_expensive.clone(),
            average_price,
            price_range,
            savings: price_range,
            categories,
            skipped_ids,
            products,
        })
    }

    /// Merge the internal price with external quotes for one product.
    ///
    /// When the price source is circuit-open or transiently failing, the
    /// result degrades to the internal quote alone with an explicit warning;
    /// no placeholder quotes are fabricated.
    pub async fn compare_prices(
        &self,
        product_id: ProductId,
    ) -> Result<PriceComparison, ComparisonError> {
        let product = self
            .repo
            .get_by_id(product_id)
            .ok_or(ComparisonError::ProductNotFound { id: product_id })?;

        let mut warnings = Vec::new();
        let mut quotes = vec![Quote {
            source: self.internal_source.clone(),
            price: product.price,
            url: format!("/products/{product_id}"),
            in_stock: true,
        }];

        match self.prices.fetch_quotes(product_id).await {
            Ok(external) => quotes.extend(external),
            Err(error)
                if matches!(
                    error.kind(),
                    SourceErrorKind::CircuitOpen
                        | SourceErrorKind::Timeout
                        | SourceErrorKind::Network
                ) =>
            {
                tracing::warn!(product_id = %product_id, error = %error, "serving internal quote only");
                warnings.push(format!("external price data unavailable: {error}"));
            }
            Err(error) => return Err(error.into()),
        }

        let in_stock: Vec<&Quote> = quotes.iter().filter(|quote| quote.in_stock).collect();
        let best_price = in_stock
            .iter()
            .min_by(|a, b| a.price.total_cmp(&b.price))
            .map(|quote| (*quote).clone())
            .ok_or(ComparisonError::NoInStockQuote { id: product_id })?;
        let max_in_stock = in_stock
            .iter()
            .map(|quote| quote.price)
            .fold(best_price.price, f64::max);
        let min_in_stock = best_price.price;

        let avg_price = round_cents(
            quotes.iter().map(|quote| quote.price).sum::<f64>() / quotes.len() as f64,
        );

        Ok(PriceComparison {
            product,
            savings: round_cents(max_in_stock - best_price.price),
            avg_price,
            price_range: PriceRange {
                min: min_in_stock,
                max: max_in_stock,
            },
            best_price,
            quotes,
            warnings,
        })
    }

    /// Rank the filtered product set by value score, at most ten entries.
    pub fn recommendations(&self, filters: &ProductFilters) -> Vec<RecommendationEntry> {
        let products = self.repo.get_all(filters);
        RecommendationScorer::rank(products, MAX_RECOMMENDATIONS)
    }
}
