//! Payment endpoints: internal payments, gateway invoices, and callbacks.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::OrderId;
use domain::{Payment, PaymentMethod};
use serde::{Deserialize, Serialize};
use store::CafeStore;

use crate::AppState;
use crate::error::ApiError;
use crate::routes::orders::parse_order_id;

#[derive(Deserialize)]
pub struct ProcessPaymentRequest {
    pub order_id: OrderId,
    pub method: PaymentMethod,
}

#[derive(Deserialize)]
pub struct CallbackRequest {
    pub reference: String,
    pub status: String,
}

#[derive(Serialize)]
pub struct InvoiceResponse {
    pub invoice_url: String,
    pub reference: String,
}

/// POST /payments — record an internally collected payment for an order's
/// full total.
#[tracing::instrument(skip(state, req))]
pub async fn process<S: CafeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<ProcessPaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    let order = state.orders.get_order(req.order_id).await?;
    let payment = state
        .payments
        .process_payment(req.order_id, order.total(), req.method)
        .await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// POST /orders/:id/invoice — create a gateway invoice for the order.
#[tracing::instrument(skip(state))]
pub async fn create_invoice<S: CafeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<InvoiceResponse>), ApiError> {
    let order_id = parse_order_id(&id)?;
    let invoice = state.payments.create_invoice(order_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(InvoiceResponse {
            invoice_url: invoice.url,
            reference: invoice.reference,
        }),
    ))
}

/// POST /payments/callback — reconcile an asynchronous gateway notification.
#[tracing::instrument(skip(state, req), fields(reference = %req.reference))]
pub async fn callback<S: CafeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CallbackRequest>,
) -> Result<Json<Payment>, ApiError> {
    let payment = state
        .payments
        .handle_callback(&req.reference, &req.status)
        .await?;
    Ok(Json(payment))
}
