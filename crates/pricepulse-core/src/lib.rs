//! # PricePulse Core
//!
//! Resilience and aggregation core for the PricePulse price comparison
//! toolkit.
//!
//! ## Overview
//!
//! This crate provides the foundational components for PricePulse:
//!
//! - **Canonical domain models** for products, quotes, and external records
//! - **External source clients** for catalog, price, and health endpoints
//! - **Circuit breaker** guarding every external call path
//! - **Retry executor** with exponential backoff for transient failures
//! - **Sync orchestrator** ingesting external snapshots and sweeping prices
//! - **Comparison engine** merging internal and external prices
//! - **Recommendation scorer** ranking products by value
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`circuit_breaker`] | Circuit breaker for resilient calls |
//! | [`clients`] | External source traits and HTTP adapters |
//! | [`comparison`] | Multi-product and per-product price comparison |
//! | [`domain`] | Domain models (Product, Quote, timestamps) |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`recommendation`] | Value scoring and ranking |
//! | [`repository`] | Product storage trait |
//! | [`retry`] | Retry policy with exponential backoff |
//! | [`sync`] | Catalog sync and price sweep orchestration |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pricepulse_core::{ComparisonEngine, ProductId};
//! use pricepulse_core::clients::{HttpPriceClient, PriceSource};
//! use pricepulse_core::http_client::{HttpAuth, ReqwestHttpClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let http = Arc::new(ReqwestHttpClient::new());
//!     let prices = HttpPriceClient::new(http, "https://prices.example.com", HttpAuth::None);
//!
//!     let quotes = prices.fetch_quotes(ProductId::new(1)).await?;
//!     for quote in quotes {
//!         println!("{}: ${:.2}", quote.source, quote.price);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / User     │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Sync / Compare  │────▶│ Retry Executor   │
//! │ Orchestration   │     └──────────────────┘
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Source Clients  │────▶│ Circuit Breaker  │
//! │ (Catalog/Price) │     └──────────────────┘
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ HTTP Client     │
//! │ (reqwest/noop)  │
//! └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result` types with structured errors:
//!
//! ```rust
//! use pricepulse_core::{SourceError, SourceErrorKind};
//!
//! fn handle_error(error: SourceError) {
//!     match error.kind() {
//!         SourceErrorKind::CircuitOpen => {
//!             // Serve degraded data, upstream is quarantined
//!         }
//!         SourceErrorKind::Timeout | SourceErrorKind::Network => {
//!             // Transient, safe to retry
//!         }
//!         _ => {}
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! - API keys are read from environment variables only (never logged)
//! - Input validation on all domain types

pub mod circuit_breaker;
pub mod clients;
pub mod comparison;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod recommendation;
pub mod repository;
pub mod retry;
pub mod sync;

// Re-export commonly used types at crate root for convenience

// Circuit breaker
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};

// Source client traits and HTTP adapters
pub use clients::{
    CatalogSource, HealthProbe, HttpCatalogClient, HttpHealthProbe, HttpPriceClient, PriceSource,
    SourceFuture,
};

// Comparison engine
pub use comparison::{
    CategoryGroup, ComparisonEngine, ComparisonResult, PriceComparison, PriceRange,
};

// Domain models
pub use domain::{
    round_cents, ExternalProductRecord, NewProduct, Product, ProductFilters, ProductId,
    ProductPatch, Quote, UtcDateTime,
};

// Error types
pub use error::{ComparisonError, SourceError, SourceErrorKind, ValidationError};

// HTTP client types
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};

// Recommendation scoring
pub use recommendation::{RecommendationEntry, RecommendationReason, RecommendationScorer};

// Repository trait
pub use repository::ProductRepository;

// Retry logic
pub use retry::RetryPolicy;

// Sync orchestration
pub use sync::{
    ApiHealth, ApiStatusReport, CancelFlag, HealthState, PriceUpdateReport, SyncOrchestrator,
    SyncReport, UpstreamEndpoints,
};
