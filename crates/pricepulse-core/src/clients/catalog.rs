use std::sync::Arc;

use serde::Deserialize;

use super::{transport_error, CatalogSource, SourceFuture};
use crate::circuit_breaker::CircuitBreaker;
use crate::domain::ExternalProductRecord;
use crate::error::SourceError;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest};

const CATALOG_TIMEOUT_MS: u64 = 10_000;

/// Client for the external product catalog API.
///
/// Owns the breaker for this endpoint; a failing catalog upstream never
/// trips the price endpoint's breaker and vice versa.
pub struct HttpCatalogClient {
    http: Arc<dyn HttpClient>,
    auth: HttpAuth,
    base_url: String,
    breaker: Arc<CircuitBreaker>,
}

impl HttpCatalogClient {
    pub fn new(http: Arc<dyn HttpClient>, base_url: impl Into<String>, auth: HttpAuth) -> Self {
        Self {
            http,
            auth,
            base_url: base_url.into(),
            breaker: Arc::new(CircuitBreaker::with_defaults("catalog")),
        }
    }

    pub fn with_breaker(mut self, breaker: Arc<CircuitBreaker>) -> Self {
        self.breaker = breaker;
        self
    }

    pub fn breaker(&self) -> &Arc<CircuitBreaker> {
        &self.breaker
    }

    async fn fetch_and_normalize(&self) -> Result<Vec<ExternalProductRecord>, SourceError> {
        let request = HttpRequest::get(&self.base_url)
            .with_header("content-type", "application/json")
            .with_auth(&self.auth)
            .with_timeout_ms(CATALOG_TIMEOUT_MS);

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| transport_error("catalog fetch", e))?;

        if !response.is_success() {
            return Err(SourceError::network(format!(
                "catalog upstream returned status {}",
                response.status
            )));
        }

        let items: Vec<RawCatalogItem> = serde_json::from_str(&response.body)
            .map_err(|e| SourceError::transform(format!("malformed catalog payload: {e}")))?;

        let total = items.len();
        let records: Vec<ExternalProductRecord> =
            items.into_iter().filter_map(normalize_item).collect();

        let dropped = total - records.len();
        if dropped > 0 {
            tracing::warn!(dropped, total, "dropped malformed catalog records");
        }

        Ok(records)
    }
}

impl CatalogSource for HttpCatalogClient {
    fn fetch_catalog<'a>(&'a self) -> SourceFuture<'a, Vec<ExternalProductRecord>> {
        Box::pin(async move {
            self.breaker
                .execute(|| self.fetch_and_normalize())
                .await
        })
    }
}

/// One item as the upstream reports it. Field names vary between feeds
/// (`title` vs `name`, `image` vs `imageUrl`), and prices arrive as either
/// numbers or strings.
#[derive(Debug, Deserialize)]
struct RawCatalogItem {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    price: Option<RawPrice>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default, rename = "imageUrl")]
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawPrice {
    Number(f64),
    Text(String),
}

impl RawPrice {
    pub(crate) fn parse(self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => value,
            Self::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        (value.is_finite() && value >= 0.0).then_some(value)
    }
}

/// A record whose name is missing or whose price is not a non-negative
/// finite number is dropped, not ingested.
fn normalize_item(item: RawCatalogItem) -> Option<ExternalProductRecord> {
    let name = item.title.or(item.name).filter(|n| !n.trim().is_empty())?;
    let price = item.price?.parse()?;
    let external_id = match item.id? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => return None,
    };

    Some(ExternalProductRecord {
        name,
        price,
        category: item
            .category
            .map(|c| c.to_lowercase())
            .unwrap_or_else(|| String::from("unknown")),
        description: item.description.unwrap_or_default(),
        image_url: item.image.or(item.image_url).unwrap_or_default(),
        external_id,
    })
}
