//! HTTP API server with observability for the cafe ordering system.
//!
//! Provides REST endpoints for ordering, the product catalog, payments, and
//! revenue reporting, plus a WebSocket feed for the kitchen dashboard, with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, patch, post};
use metrics_exporter_prometheus::PrometheusHandle;
use store::CafeStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use workflow::{
    KitchenBroadcaster, OrderWorkflow, PaymentProcessor, ProductCatalog, RevenueReport,
    SimulatedGateway,
};

/// Shared application state accessible from all handlers.
pub struct AppState<S> {
    pub orders: OrderWorkflow<S>,
    pub catalog: ProductCatalog<S>,
    pub payments: PaymentProcessor<S, SimulatedGateway>,
    pub revenue: RevenueReport<S>,
    pub kitchen: KitchenBroadcaster,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: CafeStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create::<S>))
        .route("/orders", get(routes::orders::list::<S>))
        .route("/orders/{id}", get(routes::orders::get::<S>))
        .route(
            "/orders/{id}/status",
            patch(routes::orders::update_status::<S>),
        )
        .route(
            "/orders/{id}/invoice",
            post(routes::payments::create_invoice::<S>),
        )
        .route("/products", get(routes::products::list::<S>))
        .route("/products", post(routes::products::create::<S>))
        .route("/products/low-stock", get(routes::products::low_stock::<S>))
        .route("/products/{id}", get(routes::products::get::<S>))
        .route("/products/{id}", delete(routes::products::remove::<S>))
        .route(
            "/products/{id}/discount",
            patch(routes::products::set_discount::<S>),
        )
        .route("/payments", post(routes::payments::process::<S>))
        .route("/payments/callback", post(routes::payments::callback::<S>))
        .route("/revenue", get(routes::revenue::between::<S>))
        .route("/revenue/today", get(routes::revenue::today::<S>))
        .route("/kitchen/ws", get(routes::kitchen::ws::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Wires the workflow components over a store into the shared state.
pub fn create_default_state<S: CafeStore>(store: Arc<S>, gateway_url: &str) -> Arc<AppState<S>> {
    let kitchen = KitchenBroadcaster::default();
    Arc::new(AppState {
        orders: OrderWorkflow::new(store.clone(), kitchen.clone()),
        catalog: ProductCatalog::new(store.clone()),
        payments: PaymentProcessor::new(store.clone(), SimulatedGateway::new(gateway_url)),
        revenue: RevenueReport::new(store),
        kitchen,
    })
}
