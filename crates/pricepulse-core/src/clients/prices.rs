use std::sync::Arc;

use serde::Deserialize;

use super::catalog::RawPrice;
use super::{transport_error, PriceSource, SourceFuture};
use crate::circuit_breaker::CircuitBreaker;
use crate::domain::{ProductId, Quote};
use crate::error::SourceError;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest};

const PRICE_TIMEOUT_MS: u64 = 5_000;

/// Client for the external price-comparison API.
pub struct HttpPriceClient {
    http: Arc<dyn HttpClient>,
    auth: HttpAuth,
    base_url: String,
    breaker: Arc<CircuitBreaker>,
}

impl HttpPriceClient {
    pub fn new(http: Arc<dyn HttpClient>, base_url: impl Into<String>, auth: HttpAuth) -> Self {
        Self {
            http,
            auth,
            base_url: base_url.into(),
            breaker: Arc::new(CircuitBreaker::with_defaults("prices")),
        }
    }

    pub fn with_breaker(mut self, breaker: Arc<CircuitBreaker>) -> Self {
        self.breaker = breaker;
        self
    }

    pub fn breaker(&self) -> &Arc<CircuitBreaker> {
        &self.breaker
    }

    async fn fetch_and_normalize(&self, product_id: ProductId) -> Result<Vec<Quote>, SourceError> {
        let url = format!(
            "{}/prices/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&product_id.to_string())
        );
        let request = HttpRequest::get(url)
            .with_header("content-type", "application/json")
            .with_auth(&self.auth)
            .with_timeout_ms(PRICE_TIMEOUT_MS);

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| transport_error("price fetch", e))?;

        if !response.is_success() {
            return Err(SourceError::network(format!(
                "price upstream returned status {}",
                response.status
            )));
        }

        let payload: RawPriceResponse = serde_json::from_str(&response.body)
            .map_err(|e| SourceError::transform(format!("malformed price payload: {e}")))?;

        Ok(payload
            .prices
            .into_iter()
            .filter_map(normalize_quote)
            .collect())
    }
}

impl PriceSource for HttpPriceClient {
    fn fetch_quotes<'a>(&'a self, product_id: ProductId) -> SourceFuture<'a, Vec<Quote>> {
        Box::pin(async move {
            self.breaker
                .execute(|| self.fetch_and_normalize(product_id))
                .await
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawPriceResponse {
    #[serde(default)]
    prices: Vec<RawExternalQuote>,
}

#[derive(Debug, Deserialize)]
struct RawExternalQuote {
    #[serde(default)]
    retailer: Option<String>,
    #[serde(default)]
    price: Option<RawPrice>,
    #[serde(default)]
    url: Option<String>,
    // Absent means "assume available"; only an explicit false marks it out.
    #[serde(default, rename = "inStock")]
    in_stock: Option<bool>,
}

fn normalize_quote(raw: RawExternalQuote) -> Option<Quote> {
    let price = raw.price?.parse()?;
    Some(Quote {
        source: raw.retailer.unwrap_or_else(|| String::from("External")),
        price,
        url: raw.url.unwrap_or_default(),
        in_stock: raw.in_stock != Some(false),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceErrorKind;
    use crate::http_client::{HttpError, HttpResponse};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    struct StubHttpClient {
        response: Mutex<Result<HttpResponse, HttpError>>,
        urls: Mutex<Vec<String>>,
    }

    impl StubHttpClient {
        fn new(response: Result<HttpResponse, HttpError>) -> Self {
            Self {
                response: Mutex::new(response),
                urls: Mutex::new(Vec::new()),
            }
        }
    }

    impl HttpClient for StubHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.urls
                .lock()
                .expect("url store is not poisoned")
                .push(request.url.clone());
            let response = self
                .response
                .lock()
                .expect("response store is not poisoned")
                .clone();
            Box::pin(async move { response })
        }
    }

    const PRICES_BODY: &str = r#"{
        "prices": [
            {"retailer": "RetailerA", "price": 90.0, "url": "https://a.test/p", "inStock": true},
            {"retailer": "RetailerB", "price": "110.50", "inStock": false},
            {"price": 75.0},
            {"retailer": "Broken", "price": "free"}
        ]
    }"#;

    #[tokio::test]
    async fn normalizes_quotes_and_defaults() {
        let http = Arc::new(StubHttpClient::new(Ok(HttpResponse::ok_json(PRICES_BODY))));
        let client = HttpPriceClient::new(http.clone(), "https://prices.test/", HttpAuth::None);

        let quotes = client
            .fetch_quotes(ProductId::new(42))
            .await
            .expect("quotes fetch succeeds");

        assert_eq!(quotes.len(), 3, "unparsable price is dropped");
        assert_eq!(quotes[0].source, "RetailerA");
        assert!(quotes[0].in_stock);
        assert_eq!(quotes[1].price, 110.5);
        assert!(!quotes[1].in_stock);
        assert_eq!(quotes[2].source, "External");
        assert!(quotes[2].in_stock, "missing inStock defaults to available");

        let urls = http.urls.lock().expect("not poisoned");
        assert_eq!(urls[0], "https://prices.test/prices/42");
    }

    #[tokio::test]
    async fn empty_price_list_is_a_valid_result() {
        let http = Arc::new(StubHttpClient::new(Ok(HttpResponse::ok_json("{}"))));
        let client = HttpPriceClient::new(http, "https://prices.test", HttpAuth::None);

        let quotes = client
            .fetch_quotes(ProductId::new(1))
            .await
            .expect("no offers is not an error");
        assert!(quotes.is_empty());
    }

    #[tokio::test]
    async fn breaker_opens_after_threshold_and_blocks_without_network_call() {
        let http = Arc::new(StubHttpClient::new(Err(HttpError::network(
            "connection refused",
        ))));
        let client = HttpPriceClient::new(http.clone(), "https://prices.test", HttpAuth::None);

        for _ in 0..5 {
            let error = client
                .fetch_quotes(ProductId::new(1))
                .await
                .expect_err("transport fails");
            assert_eq!(error.kind(), SourceErrorKind::Network);
        }

        let issued_before = http.urls.lock().expect("not poisoned").len();
        let error = client
            .fetch_quotes(ProductId::new(1))
            .await
            .expect_err("breaker is open");
        assert_eq!(error.kind(), SourceErrorKind::CircuitOpen);
        let issued_after = http.urls.lock().expect("not poisoned").len();
        assert_eq!(issued_before, issued_after, "open circuit skips the network");
    }
}
