//! Typed upstream source clients.
//!
//! Each client translates one raw upstream API into internal records and
//! owns the circuit breaker for its endpoint. The health probe deliberately
//! bypasses the breakers: its job is to observe true upstream health.

pub mod catalog;
pub mod health;
pub mod mock;
pub mod prices;

use std::future::Future;
use std::pin::Pin;

use crate::domain::{ExternalProductRecord, ProductId, Quote};
use crate::error::SourceError;
use crate::http_client::{HttpError, HttpErrorKind};

pub use catalog::HttpCatalogClient;
pub use health::HttpHealthProbe;
pub use prices::HttpPriceClient;

/// Boxed future returned by all source trait methods.
pub type SourceFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Full-catalog snapshot source (one instance per upstream catalog API).
pub trait CatalogSource: Send + Sync {
    fn fetch_catalog<'a>(&'a self) -> SourceFuture<'a, Vec<ExternalProductRecord>>;
}

/// Per-product quote source. An empty result is valid: no external offers.
pub trait PriceSource: Send + Sync {
    fn fetch_quotes<'a>(&'a self, product_id: ProductId) -> SourceFuture<'a, Vec<Quote>>;
}

/// Lightweight reachability probe, never breaker-protected.
pub trait HealthProbe: Send + Sync {
    /// Returns the observed round-trip latency in milliseconds.
    fn ping<'a>(&'a self, base_url: &'a str) -> SourceFuture<'a, u64>;
}

pub(crate) fn transport_error(context: &str, error: HttpError) -> SourceError {
    match error.kind() {
        HttpErrorKind::Timeout => SourceError::timeout(format!("{context}: {}", error.message())),
        HttpErrorKind::Network => SourceError::network(format!("{context}: {}", error.message())),
    }
}
