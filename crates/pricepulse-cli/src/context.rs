//! Wiring of repositories, source clients, and orchestrators.
//!
//! Real mode reads upstream endpoints and API keys from the environment;
//! keys never appear in logs or output. Mock mode uses the deterministic
//! offline sources and a seeded demo catalog.

use std::sync::Arc;

use pricepulse_core::clients::mock::{MockCatalogSource, MockHealthProbe, MockPriceSource};
use pricepulse_core::{
    CatalogSource, ComparisonEngine, HealthProbe, HttpAuth, HttpCatalogClient, HttpHealthProbe,
    HttpPriceClient, PriceSource, ProductRepository, ReqwestHttpClient, RetryPolicy,
    SyncOrchestrator, UpstreamEndpoints,
};
use pricepulse_store::InMemoryProductRepository;

use crate::error::CliError;

const PRODUCT_API_URL: &str = "PRICEPULSE_PRODUCT_API_URL";
const PRODUCT_API_KEY: &str = "PRICEPULSE_PRODUCT_API_KEY";
const PRICE_API_URL: &str = "PRICEPULSE_PRICE_API_URL";
const PRICE_API_KEY: &str = "PRICEPULSE_PRICE_API_KEY";

/// Shared application wiring for all commands.
pub struct AppContext {
    pub repo: Arc<dyn ProductRepository>,
    pub catalog: Arc<dyn CatalogSource>,
    pub prices: Arc<dyn PriceSource>,
    pub probe: Arc<dyn HealthProbe>,
    pub endpoints: UpstreamEndpoints,
}

impl AppContext {
    pub fn build(mock: bool) -> Result<Self, CliError> {
        if mock {
            Ok(Self::mock())
        } else {
            Self::from_env()
        }
    }

    fn mock() -> Self {
        Self {
            repo: Arc::new(InMemoryProductRepository::with_demo_catalog()),
            catalog: Arc::new(MockCatalogSource),
            prices: Arc::new(MockPriceSource),
            probe: Arc::new(MockHealthProbe),
            endpoints: UpstreamEndpoints {
                catalog_base_url: String::from("mock://catalog"),
                price_base_url: String::from("mock://prices"),
            },
        }
    }

    fn from_env() -> Result<Self, CliError> {
        let catalog_base_url = required_env(PRODUCT_API_URL)?;
        let price_base_url = required_env(PRICE_API_URL)?;
        let catalog_auth = optional_bearer(PRODUCT_API_KEY);
        let price_auth = optional_bearer(PRICE_API_KEY);

        let http = Arc::new(ReqwestHttpClient::new());
        Ok(Self {
            repo: Arc::new(InMemoryProductRepository::new()),
            catalog: Arc::new(HttpCatalogClient::new(
                http.clone(),
                catalog_base_url.clone(),
                catalog_auth,
            )),
            prices: Arc::new(HttpPriceClient::new(
                http.clone(),
                price_base_url.clone(),
                price_auth,
            )),
            probe: Arc::new(HttpHealthProbe::new(http)),
            endpoints: UpstreamEndpoints {
                catalog_base_url,
                price_base_url,
            },
        })
    }

    pub fn orchestrator(&self, retry: RetryPolicy) -> SyncOrchestrator {
        SyncOrchestrator::new(
            self.catalog.clone(),
            self.prices.clone(),
            self.repo.clone(),
            self.probe.clone(),
            self.endpoints.clone(),
        )
        .with_retry(retry)
    }

    pub fn engine(&self) -> ComparisonEngine {
        ComparisonEngine::new(self.repo.clone(), self.prices.clone())
    }
}

fn required_env(name: &str) -> Result<String, CliError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(CliError::Config(format!(
            "{name} must be set (or pass --mock for offline mode)"
        ))),
    }
}

fn optional_bearer(name: &str) -> HttpAuth {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => HttpAuth::BearerToken(value),
        _ => HttpAuth::None,
    }
}
