//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use store::{CafeStore, InMemoryCafeStore};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> (Router, Arc<InMemoryCafeStore>) {
    let store = Arc::new(InMemoryCafeStore::new());
    let state = api::create_default_state(store.clone(), "https://pay.test");
    let app = api::create_app(state, get_metrics_handle());
    (app, store)
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn send_get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn add_product(app: &Router, name: &str, cents: i64, stock: u32) -> String {
    let (status, json) = send_json(
        app,
        "POST",
        "/products",
        serde_json::json!({
            "name": name,
            "price_cents": cents,
            "stock": stock,
            "kind": { "kind": "food", "vegetarian": false }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = setup();
    let (status, json) = send_get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "cafe-api");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _) = setup();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_order_reserves_stock() {
    let (app, _) = setup();
    let product_id = add_product(&app, "Croissant", 25000, 5).await;

    let (status, order) = send_json(
        &app,
        "POST",
        "/orders",
        serde_json::json!({
            "customer_name": "table 4",
            "items": [{ "product_id": product_id, "quantity": 3 }]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "Pending");
    assert_eq!(order["total"], 75000);
    assert_eq!(order["items"].as_array().unwrap().len(), 1);

    let (status, product) = send_get(&app, &format!("/products/{product_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["stock"], 2);
}

#[tokio::test]
async fn test_create_order_insufficient_stock() {
    let (app, _) = setup();
    let product_id = add_product(&app, "Cake", 35000, 2).await;

    let (status, json) = send_json(
        &app,
        "POST",
        "/orders",
        serde_json::json!({
            "items": [{ "product_id": product_id, "quantity": 3 }]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("insufficient stock"), "got {message:?}");
}

#[tokio::test]
async fn test_create_order_unknown_product() {
    let (app, _) = setup();
    let fake_id = uuid::Uuid::new_v4();

    let (status, _) = send_json(
        &app,
        "POST",
        "/orders",
        serde_json::json!({
            "items": [{ "product_id": fake_id.to_string(), "quantity": 1 }]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_order_empty_items() {
    let (app, _) = setup();
    let (status, _) = send_json(&app, "POST", "/orders", serde_json::json!({ "items": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_order_lifecycle_and_revenue() {
    let (app, _) = setup();
    let product_id = add_product(&app, "Espresso", 20000, 10).await;

    let (_, order) = send_json(
        &app,
        "POST",
        "/orders",
        serde_json::json!({
            "items": [{ "product_id": product_id, "quantity": 2 }]
        }),
    )
    .await;
    let order_id = order["id"].as_str().unwrap().to_string();

    for target in ["Preparing", "Ready", "Completed"] {
        let (status, updated) = send_json(
            &app,
            "PATCH",
            &format!("/orders/{order_id}/status"),
            serde_json::json!({ "status": target }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], target);
    }

    let (status, revenue) = send_get(&app, "/revenue/today").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(revenue["total_cents"], 40000);
}

#[tokio::test]
async fn test_invalid_transition_rejected() {
    let (app, _) = setup();
    let product_id = add_product(&app, "Espresso", 20000, 10).await;

    let (_, order) = send_json(
        &app,
        "POST",
        "/orders",
        serde_json::json!({
            "items": [{ "product_id": product_id, "quantity": 1 }]
        }),
    )
    .await;
    let order_id = order["id"].as_str().unwrap();

    let (status, _) = send_json(
        &app,
        "PATCH",
        &format!("/orders/{order_id}/status"),
        serde_json::json!({ "status": "Completed" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cancel_restores_stock() {
    let (app, _) = setup();
    let product_id = add_product(&app, "Wrap", 45000, 5).await;

    let (_, order) = send_json(
        &app,
        "POST",
        "/orders",
        serde_json::json!({
            "items": [{ "product_id": product_id, "quantity": 3 }]
        }),
    )
    .await;
    let order_id = order["id"].as_str().unwrap();

    let (status, cancelled) = send_json(
        &app,
        "PATCH",
        &format!("/orders/{order_id}/status"),
        serde_json::json!({ "status": "Cancelled" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "Cancelled");

    let (_, product) = send_get(&app, &format!("/products/{product_id}")).await;
    assert_eq!(product["stock"], 5);
}

#[tokio::test]
async fn test_update_status_unknown_order() {
    let (app, _) = setup();
    let fake_id = uuid::Uuid::new_v4();

    let (status, _) = send_json(
        &app,
        "PATCH",
        &format!("/orders/{fake_id}/status"),
        serde_json::json!({ "status": "Preparing" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_order_id_format() {
    let (app, _) = setup();
    let (status, _) = send_get(&app, "/orders/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_orders_filters() {
    let (app, _) = setup();
    let product_id = add_product(&app, "Espresso", 20000, 50).await;

    for _ in 0..3 {
        let (status, _) = send_json(
            &app,
            "POST",
            "/orders",
            serde_json::json!({
                "items": [{ "product_id": product_id, "quantity": 1 }]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, active) = send_get(&app, "/orders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(active.as_array().unwrap().len(), 3);

    let (status, recent) = send_get(&app, "/orders?filter=recent").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(recent.as_array().unwrap().len(), 3);

    let (status, _) = send_get(&app, "/orders?filter=bogus").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_orders_for_customer() {
    let (app, _) = setup();
    let product_id = add_product(&app, "Espresso", 20000, 50).await;

    send_json(
        &app,
        "POST",
        "/orders",
        serde_json::json!({
            "customer_name": "alex",
            "items": [{ "product_id": product_id, "quantity": 1 }]
        }),
    )
    .await;
    send_json(
        &app,
        "POST",
        "/orders",
        serde_json::json!({
            "customer_name": "sam",
            "items": [{ "product_id": product_id, "quantity": 1 }]
        }),
    )
    .await;

    let (status, orders) = send_get(&app, "/orders?customer=alex").await;
    assert_eq!(status, StatusCode::OK);
    let orders = orders.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["customer_name"], "alex");
}

#[tokio::test]
async fn test_product_catalog_crud() {
    let (app, _) = setup();
    let product_id = add_product(&app, "Hot Chocolate", 32000, 60).await;

    let (status, products) = send_get(&app, "/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(products.as_array().unwrap().len(), 1);

    let (status, available) = send_get(&app, "/products?available=true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(available.as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/products/{product_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, _) = send_get(&app, &format!("/products/{product_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_low_stock_endpoint() {
    let (app, _) = setup();
    add_product(&app, "Scarce", 10000, 2).await;
    add_product(&app, "Plenty", 10000, 40).await;

    let (status, low) = send_get(&app, "/products/low-stock?threshold=5").await;
    assert_eq!(status, StatusCode::OK);
    let low = low.as_array().unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0]["name"], "Scarce");
}

#[tokio::test]
async fn test_product_discount() {
    let (app, _) = setup();
    let product_id = add_product(&app, "Cake", 10000, 10).await;

    let (status, discounted) = send_json(
        &app,
        "PATCH",
        &format!("/products/{product_id}/discount"),
        serde_json::json!({ "percentage": 0.25 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(discounted["discount_percentage"], 0.25);
}

#[tokio::test]
async fn test_process_payment() {
    let (app, store) = setup();
    let product_id = add_product(&app, "Salad", 48000, 10).await;

    let (_, order) = send_json(
        &app,
        "POST",
        "/orders",
        serde_json::json!({
            "items": [{ "product_id": product_id, "quantity": 1 }]
        }),
    )
    .await;
    let order_id = order["id"].as_str().unwrap();

    let (status, payment) = send_json(
        &app,
        "POST",
        "/payments",
        serde_json::json!({ "order_id": order_id, "method": "Cash" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(payment["status"], "Completed");
    assert_eq!(payment["amount"], 48000);
    assert!(payment["transaction_id"].as_str().unwrap().starts_with("TRX-"));

    let stored = store
        .get_order(common::OrderId::parse(order_id).unwrap())
        .await
        .unwrap();
    assert!(stored.payment_id().is_some());
}

#[tokio::test]
async fn test_invoice_and_callback_flow() {
    let (app, _) = setup();
    let product_id = add_product(&app, "Matcha", 42000, 10).await;

    let (_, order) = send_json(
        &app,
        "POST",
        "/orders",
        serde_json::json!({
            "items": [{ "product_id": product_id, "quantity": 1 }]
        }),
    )
    .await;
    let order_id = order["id"].as_str().unwrap();

    let (status, invoice) = send_json(
        &app,
        "POST",
        &format!("/orders/{order_id}/invoice"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let reference = invoice["reference"].as_str().unwrap();
    assert!(reference.starts_with("SC-"));
    assert!(invoice["invoice_url"].as_str().unwrap().contains(reference));

    let (status, payment) = send_json(
        &app,
        "POST",
        "/payments/callback",
        serde_json::json!({ "reference": reference, "status": "PAID" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payment["status"], "Completed");
}

#[tokio::test]
async fn test_callback_with_unknown_reference() {
    let (app, _) = setup();
    let (status, _) = send_json(
        &app,
        "POST",
        "/payments/callback",
        serde_json::json!({ "reference": "garbage", "status": "PAID" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_revenue_window_validation() {
    let (app, _) = setup();
    let (status, _) = send_get(
        &app,
        "/revenue?start=2026-08-02T00:00:00Z&end=2026-08-01T00:00:00Z",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, revenue) = send_get(
        &app,
        "/revenue?start=2026-08-01T00:00:00Z&end=2026-08-02T00:00:00Z",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(revenue["total_cents"], 0);
}
