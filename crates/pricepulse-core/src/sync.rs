//! Bulk ingestion and price-update sweeps over the external sources.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::clients::{CatalogSource, HealthProbe, PriceSource};
use crate::domain::{ProductFilters, ProductPatch, UtcDateTime};
use crate::repository::ProductRepository;
use crate::retry::RetryPolicy;

/// Cooperative cancellation for an in-flight price sweep.
///
/// Checked between items only, so already-applied updates are never undone.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of a full catalog sync.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub synced_count: usize,
    pub errors: Vec<String>,
}

/// Outcome of a price-update sweep. Per-item failures are accumulated, never
/// raised; one bad product must not block updates to the others.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PriceUpdateReport {
    pub updated_count: usize,
    pub errors: Vec<String>,
    pub cancelled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    Healthy,
    Unhealthy,
}

/// Probe outcome for one upstream endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ApiHealth {
    pub status: HealthState,
    pub response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiStatusReport {
    pub catalog: ApiHealth,
    pub prices: ApiHealth,
}

/// Base URLs of the configured upstreams, used by the health checks.
#[derive(Debug, Clone)]
pub struct UpstreamEndpoints {
    pub catalog_base_url: String,
    pub price_base_url: String,
}

/// Drives bulk product ingestion and price-update sweeps through the
/// breaker-protected source clients, accounting for partial failures.
pub struct SyncOrchestrator {
    catalog: Arc<dyn CatalogSource>,
    prices: Arc<dyn PriceSource>,
    repo: Arc<dyn ProductRepository>,
    probe: Arc<dyn HealthProbe>,
    endpoints: UpstreamEndpoints,
    retry: RetryPolicy,
}

impl SyncOrchestrator {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        prices: Arc<dyn PriceSource>,
        repo: Arc<dyn ProductRepository>,
        probe: Arc<dyn HealthProbe>,
        endpoints: UpstreamEndpoints,
    ) -> Self {
        Self {
            catalog,
            prices,
            repo,
            probe,
            endpoints,
            retry: RetryPolicy::none(),
        }
    }

    /// Retry the catalog fetch on transient failures. Each attempt passes
    /// through the catalog client's breaker and counts as one breaker signal.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Fetch a full catalog snapshot and bulk-ingest it.
    ///
    /// Never raises: an upstream failure (including an open circuit) yields
    /// `synced_count = 0` plus one structured error entry.
    pub async fn sync_products(&self) -> SyncReport {
        let mut report = SyncReport::default();

        match self.retry.run(|| self.catalog.fetch_catalog()).await {
            Ok(records) => {
                if records.is_empty() {
                    tracing::info!("catalog snapshot was empty, nothing to ingest");
                    return report;
                }
                let created = self
                    .repo
                    .bulk_create(records.into_iter().map(Into::into).collect());
                report.synced_count = created.len();
                tracing::info!(count = report.synced_count, "synced products from catalog source");
            }
            Err(error) => {
                tracing::error!(error = %error, "catalog sync failed");
                report.errors.push(format!("catalog source: {error}"));
            }
        }

        report
    }

    /// Sweep every known product and adopt a strictly lower external price.
    ///
    /// Failures are recorded per item and the sweep continues; the flag
    /// aborts between items without touching already-applied updates.
    pub async fn update_prices(&self, cancel: &CancelFlag) -> PriceUpdateReport {
        let mut report = PriceUpdateReport::default();
        let products = self.repo.get_all(&ProductFilters::default());

        for product in products {
            if cancel.is_cancelled() {
                tracing::info!(
                    updated = report.updated_count,
                    "price sweep cancelled between items"
                );
                report.cancelled = true;
                break;
            }

            match self.prices.fetch_quotes(product.id).await {
                Ok(quotes) => {
                    let best_external = quotes
                        .iter()
                        .map(|quote| quote.price)
                        .min_by(f64::total_cmp);

                    if let Some(best) = best_external {
                        if best < product.price {
                            let patch = ProductPatch::price(best, UtcDateTime::now());
                            if self.repo.update(product.id, patch).is_some() {
                                report.updated_count += 1;
                            }
                        }
                    }
                }
                Err(error) => {
                    tracing::warn!(product_id = %product.id, error = %error, "price refresh failed");
                    report.errors.push(format!("product {}: {error}", product.id));
                }
            }
        }

        report
    }

    /// Probe one upstream. Never breaker-protected: the probe's purpose is
    /// to observe true upstream health.
    pub async fn check_api_health(&self, base_url: &str) -> ApiHealth {
        let started = Instant::now();
        match self.probe.ping(base_url).await {
            Ok(latency_ms) => ApiHealth {
                status: HealthState::Healthy,
                response_time_ms: latency_ms,
                error: None,
            },
            Err(error) => ApiHealth {
                status: HealthState::Unhealthy,
                response_time_ms: started.elapsed().as_millis() as u64,
                error: Some(error.to_string()),
            },
        }
    }

    pub async fn check_external_apis(&self) -> ApiStatusReport {
        ApiStatusReport {
            catalog: self.check_api_health(&self.endpoints.catalog_base_url).await,
            prices: self.check_api_health(&self.endpoints.price_base_url).await,
        }
    }
}
