//! End-to-end behavior tests for catalog sync and price sweeps, run against
//! the real in-memory store.

use std::time::Duration;

use pricepulse_tests::{
    endpoints, quote, record, AlwaysPrices, Arc, CancelFlag, FlakyCatalog, HealthState,
    InMemoryProductRepository, ProductFilters, ProductRepository, RetryPolicy, ScriptedPrices,
    SourceError, StaticProbe, SyncOrchestrator,
};

// =============================================================================
// Catalog Sync
// =============================================================================

#[tokio::test]
async fn when_catalog_is_reachable_the_full_snapshot_is_ingested() {
    let repo = Arc::new(InMemoryProductRepository::new());
    let catalog = Arc::new(FlakyCatalog::new(
        0,
        vec![
            record("Pixel 9", 799.0, "smartphones"),
            record("ThinkPad X1", 1349.0, "laptops"),
        ],
    ));
    let orchestrator = SyncOrchestrator::new(
        catalog,
        Arc::new(AlwaysPrices::new(Ok(Vec::new()))),
        repo.clone(),
        Arc::new(StaticProbe::healthy(10)),
        endpoints(),
    );

    let report = orchestrator.sync_products().await;

    assert_eq!(report.synced_count, 2);
    assert!(report.errors.is_empty());

    let all = repo.get_all(&ProductFilters::default());
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].name, "Pixel 9");
    assert_eq!(all[0].external_id.as_deref(), Some("ext_Pixel 9"));
}

#[tokio::test]
async fn when_catalog_recovers_within_the_retry_budget_sync_succeeds() {
    let repo = Arc::new(InMemoryProductRepository::new());
    let catalog = Arc::new(FlakyCatalog::new(2, vec![record("Buds", 179.0, "audio")]));
    let orchestrator = SyncOrchestrator::new(
        catalog.clone(),
        Arc::new(AlwaysPrices::new(Ok(Vec::new()))),
        repo.clone(),
        Arc::new(StaticProbe::healthy(10)),
        endpoints(),
    )
    .with_retry(RetryPolicy::new(3, Duration::ZERO));

    let report = orchestrator.sync_products().await;

    assert_eq!(report.synced_count, 1);
    assert!(report.errors.is_empty());
    assert_eq!(*catalog.calls.lock().expect("not poisoned"), 3);
}

#[tokio::test]
async fn when_catalog_stays_down_sync_reports_one_error_and_stores_nothing() {
    let repo = Arc::new(InMemoryProductRepository::new());
    let catalog = Arc::new(FlakyCatalog::new(10, Vec::new()));
    let orchestrator = SyncOrchestrator::new(
        catalog,
        Arc::new(AlwaysPrices::new(Ok(Vec::new()))),
        repo.clone(),
        Arc::new(StaticProbe::healthy(10)),
        endpoints(),
    )
    .with_retry(RetryPolicy::new(2, Duration::ZERO));

    let report = orchestrator.sync_products().await;

    assert_eq!(report.synced_count, 0);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with("catalog source:"));
    assert!(repo.is_empty());
}

// =============================================================================
// Price Sweep
// =============================================================================

fn seeded_repo(prices: &[f64]) -> Arc<InMemoryProductRepository> {
    let repo = Arc::new(InMemoryProductRepository::new());
    for (index, price) in prices.iter().enumerate() {
        repo.create(
            pricepulse_tests::NewProduct::new(format!("P{index}"), *price, "gadgets")
                .expect("valid product"),
        );
    }
    repo
}

#[tokio::test]
async fn when_an_external_quote_is_lower_the_price_is_adopted_and_stamped() {
    let repo = seeded_repo(&[100.0]);
    let orchestrator = SyncOrchestrator::new(
        Arc::new(FlakyCatalog::new(0, Vec::new())),
        Arc::new(AlwaysPrices::new(Ok(vec![
            quote("RetailerA", 89.5, true),
            quote("RetailerB", 120.0, true),
        ]))),
        repo.clone(),
        Arc::new(StaticProbe::healthy(10)),
        endpoints(),
    );

    let report = orchestrator.update_prices(&CancelFlag::new()).await;

    assert_eq!(report.updated_count, 1);
    assert!(report.errors.is_empty());
    assert!(!report.cancelled);

    let product = repo
        .get_by_id(pricepulse_tests::ProductId::new(1))
        .expect("product exists");
    assert_eq!(product.price, 89.5);
    assert!(product.price_updated_at.is_some());
}

#[tokio::test]
async fn when_external_quotes_are_higher_the_internal_price_stands() {
    let repo = seeded_repo(&[100.0]);
    let orchestrator = SyncOrchestrator::new(
        Arc::new(FlakyCatalog::new(0, Vec::new())),
        Arc::new(AlwaysPrices::new(Ok(vec![quote("RetailerA", 100.0, true)]))),
        repo.clone(),
        Arc::new(StaticProbe::healthy(10)),
        endpoints(),
    );

    let report = orchestrator.update_prices(&CancelFlag::new()).await;

    // Equal is not strictly lower
    assert_eq!(report.updated_count, 0);
    let product = repo
        .get_by_id(pricepulse_tests::ProductId::new(1))
        .expect("product exists");
    assert_eq!(product.price, 100.0);
    assert!(product.price_updated_at.is_none());
}

#[tokio::test]
async fn when_one_product_fails_the_sweep_continues_past_it() {
    let repo = seeded_repo(&[100.0, 200.0]);
    let orchestrator = SyncOrchestrator::new(
        Arc::new(FlakyCatalog::new(0, Vec::new())),
        Arc::new(ScriptedPrices::new(vec![
            Err(SourceError::timeout("price api timed out")),
            Ok(vec![quote("RetailerA", 150.0, true)]),
        ])),
        repo.clone(),
        Arc::new(StaticProbe::healthy(10)),
        endpoints(),
    );

    let report = orchestrator.update_prices(&CancelFlag::new()).await;

    assert_eq!(report.updated_count, 1);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with("product 1:"));

    let second = repo
        .get_by_id(pricepulse_tests::ProductId::new(2))
        .expect("product exists");
    assert_eq!(second.price, 150.0);
}

#[tokio::test]
async fn when_cancelled_up_front_no_product_is_touched() {
    let repo = seeded_repo(&[100.0, 200.0]);
    let orchestrator = SyncOrchestrator::new(
        Arc::new(FlakyCatalog::new(0, Vec::new())),
        Arc::new(AlwaysPrices::new(Ok(vec![quote("RetailerA", 1.0, true)]))),
        repo.clone(),
        Arc::new(StaticProbe::healthy(10)),
        endpoints(),
    );

    let cancel = CancelFlag::new();
    cancel.cancel();
    let report = orchestrator.update_prices(&cancel).await;

    assert!(report.cancelled);
    assert_eq!(report.updated_count, 0);
    let product = repo
        .get_by_id(pricepulse_tests::ProductId::new(1))
        .expect("product exists");
    assert_eq!(product.price, 100.0);
}

// =============================================================================
// Upstream Health
// =============================================================================

#[tokio::test]
async fn when_upstreams_respond_health_reports_latency() {
    let orchestrator = SyncOrchestrator::new(
        Arc::new(FlakyCatalog::new(0, Vec::new())),
        Arc::new(AlwaysPrices::new(Ok(Vec::new()))),
        Arc::new(InMemoryProductRepository::new()),
        Arc::new(StaticProbe::healthy(23)),
        endpoints(),
    );

    let status = orchestrator.check_external_apis().await;

    assert_eq!(status.catalog.status, HealthState::Healthy);
    assert_eq!(status.catalog.response_time_ms, 23);
    assert!(status.catalog.error.is_none());
    assert_eq!(status.prices.status, HealthState::Healthy);
}

#[tokio::test]
async fn when_an_upstream_is_down_health_carries_the_error() {
    let orchestrator = SyncOrchestrator::new(
        Arc::new(FlakyCatalog::new(0, Vec::new())),
        Arc::new(AlwaysPrices::new(Ok(Vec::new()))),
        Arc::new(InMemoryProductRepository::new()),
        Arc::new(StaticProbe::unhealthy(SourceError::network(
            "connection refused",
        ))),
        endpoints(),
    );

    let status = orchestrator.check_external_apis().await;

    assert_eq!(status.catalog.status, HealthState::Unhealthy);
    assert!(status
        .catalog
        .error
        .as_deref()
        .expect("error is recorded")
        .contains("connection refused"));
}
