//! Revenue reporting over completed orders.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use domain::Money;
use store::CafeStore;

use crate::error::WorkflowError;

/// Read-side revenue aggregation. Only orders that reached the completed
/// state count towards revenue.
pub struct RevenueReport<S> {
    store: Arc<S>,
}

impl<S: CafeStore> RevenueReport<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Total revenue in the half-open window `[start, end)`.
    pub async fn revenue_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Money, WorkflowError> {
        Ok(self.store.revenue_between(start, end).await?)
    }

    /// Revenue for a single calendar date, UTC midnight to midnight.
    pub async fn daily_revenue(&self, date: NaiveDate) -> Result<Money, WorkflowError> {
        let start = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
        let end = match date.succ_opt() {
            Some(next) => Utc.from_utc_datetime(&next.and_time(NaiveTime::MIN)),
            None => DateTime::<Utc>::MAX_UTC,
        };
        self.revenue_between(start, end).await
    }

    /// Revenue for the current UTC date.
    pub async fn today_revenue(&self) -> Result<Money, WorkflowError> {
        self.daily_revenue(Utc::now().date_naive()).await
    }
}
