//! Product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::ProductId;
use domain::Product;
use serde::Deserialize;
use store::CafeStore;
use workflow::NewProduct;

use crate::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct ListProductsQuery {
    pub available: Option<bool>,
}

#[derive(Deserialize)]
pub struct LowStockQuery {
    pub threshold: Option<u32>,
}

#[derive(Deserialize)]
pub struct DiscountRequest {
    pub percentage: f64,
}

/// GET /products — the whole catalog, or `?available=true` for the menu.
#[tracing::instrument(skip(state, query))]
pub async fn list<S: CafeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = if query.available.unwrap_or(false) {
        state.catalog.list_available().await?
    } else {
        state.catalog.list_all().await?
    };
    Ok(Json(products))
}

/// POST /products — add a product to the catalog.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: CafeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = state.catalog.create(req).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /products/:id — fetch one product.
#[tracing::instrument(skip(state))]
pub async fn get<S: CafeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product_id = parse_product_id(&id)?;
    let product = state.catalog.get(product_id).await?;
    Ok(Json(product))
}

/// DELETE /products/:id — remove a product from the catalog.
#[tracing::instrument(skip(state))]
pub async fn remove<S: CafeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let product_id = parse_product_id(&id)?;
    state.catalog.delete(product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /products/:id/discount — set a product's discount percentage.
#[tracing::instrument(skip(state, req))]
pub async fn set_discount<S: CafeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<DiscountRequest>,
) -> Result<Json<Product>, ApiError> {
    let product_id = parse_product_id(&id)?;
    let product = state
        .catalog
        .set_discount(product_id, req.percentage)
        .await?;
    Ok(Json(product))
}

/// GET /products/low-stock?threshold=N — products running out, default
/// threshold 5.
#[tracing::instrument(skip(state, query))]
pub async fn low_stock<S: CafeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<LowStockQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state
        .catalog
        .low_stock(query.threshold.unwrap_or(5))
        .await?;
    Ok(Json(products))
}

fn parse_product_id(id: &str) -> Result<ProductId, ApiError> {
    ProductId::parse(id).map_err(|e| ApiError::BadRequest(format!("invalid product id: {e}")))
}
