//! Order lifecycle endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::OrderId;
use domain::{Order, OrderStatus};
use serde::Deserialize;
use store::CafeStore;
use workflow::OrderRequest;

use crate::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Deserialize)]
pub struct ListOrdersQuery {
    pub filter: Option<String>,
    pub customer: Option<String>,
}

/// POST /orders — place a new order, reserving stock for every line.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: CafeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<OrderRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = state.orders.create_order(req).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders/:id — fetch one order.
#[tracing::instrument(skip(state))]
pub async fn get<S: CafeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state.orders.get_order(order_id).await?;
    Ok(Json(order))
}

/// GET /orders — list orders.
///
/// `?filter=active` (the default) returns orders the kitchen still has to
/// serve, oldest first; `?filter=recent` the latest orders, newest first.
/// `?customer=<label>` returns one customer's history instead.
#[tracing::instrument(skip(state, query))]
pub async fn list<S: CafeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<Order>>, ApiError> {
    if let Some(customer) = &query.customer {
        return Ok(Json(state.orders.orders_for_customer(customer).await?));
    }

    let orders = match query.filter.as_deref() {
        None | Some("active") => state.orders.active_orders().await?,
        Some("recent") => state.orders.recent_orders().await?,
        Some(other) => {
            return Err(ApiError::BadRequest(format!(
                "unknown filter {other:?}, expected \"active\" or \"recent\""
            )));
        }
    };
    Ok(Json(orders))
}

/// PATCH /orders/:id/status — move an order through its lifecycle.
#[tracing::instrument(skip(state, req))]
pub async fn update_status<S: CafeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state.orders.update_status(order_id, req.status).await?;
    Ok(Json(order))
}

pub(crate) fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    OrderId::parse(id).map_err(|e| ApiError::BadRequest(format!("invalid order id: {e}")))
}
