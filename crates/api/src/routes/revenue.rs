//! Revenue reporting endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use store::CafeStore;

use crate::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct RevenueQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct RevenueResponse {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub total_cents: i64,
}

#[derive(Serialize)]
pub struct DailyRevenueResponse {
    pub date: NaiveDate,
    pub total_cents: i64,
}

/// GET /revenue?start&end — completed-order revenue in `[start, end)`.
#[tracing::instrument(skip(state, query))]
pub async fn between<S: CafeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<RevenueQuery>,
) -> Result<Json<RevenueResponse>, ApiError> {
    if query.end < query.start {
        return Err(ApiError::BadRequest(
            "end must not be before start".to_string(),
        ));
    }
    let total = state.revenue.revenue_between(query.start, query.end).await?;
    Ok(Json(RevenueResponse {
        start: query.start,
        end: query.end,
        total_cents: total.cents(),
    }))
}

/// GET /revenue/today — completed-order revenue for the current UTC date.
#[tracing::instrument(skip(state))]
pub async fn today<S: CafeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<DailyRevenueResponse>, ApiError> {
    let total = state.revenue.today_revenue().await?;
    Ok(Json(DailyRevenueResponse {
        date: Utc::now().date_naive(),
        total_cents: total.cents(),
    }))
}
