//! The order workflow engine.

use std::sync::Arc;

use common::{OrderId, ProductId};
use domain::{DomainError, Order, OrderItem, OrderStatus};
use serde::Deserialize;
use store::{CafeStore, StoreError};

use crate::error::WorkflowError;
use crate::kitchen::KitchenBroadcaster;

/// How many orders the recent-orders view returns.
pub const RECENT_ORDER_LIMIT: usize = 10;

/// A requested line item.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub special_request: Option<String>,
}

/// An incoming place-order request.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRequest {
    pub customer_name: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<OrderLine>,
}

/// Orchestrates the order lifecycle: stock reservation, persistence, status
/// transitions with compensating stock restoration, and kitchen notification.
pub struct OrderWorkflow<S> {
    store: Arc<S>,
    kitchen: KitchenBroadcaster,
}

impl<S: CafeStore> OrderWorkflow<S> {
    /// Creates a workflow engine over a store and a kitchen broadcaster.
    pub fn new(store: Arc<S>, kitchen: KitchenBroadcaster) -> Self {
        Self { store, kitchen }
    }

    /// Places a new order.
    ///
    /// For each requested line, in request order, the product's stock is
    /// decremented atomically and its current price snapshotted. If any line
    /// fails — unknown product, insufficient stock, or the final persist —
    /// every decrement already applied is rolled back, so a failed request
    /// never leaves partially reserved stock behind.
    #[tracing::instrument(skip(self, request), fields(customer = ?request.customer_name))]
    pub async fn create_order(&self, request: OrderRequest) -> Result<Order, WorkflowError> {
        if request.items.is_empty() {
            return Err(DomainError::NoItems.into());
        }
        if let Some(line) = request.items.iter().find(|l| l.quantity == 0) {
            return Err(DomainError::InvalidQuantity {
                quantity: line.quantity,
            }
            .into());
        }

        let mut reserved: Vec<(ProductId, u32)> = Vec::new();
        let mut items = Vec::with_capacity(request.items.len());

        for line in &request.items {
            match self.store.decrease_stock(line.product_id, line.quantity).await {
                Ok(product) => {
                    reserved.push((line.product_id, line.quantity));
                    items.push(OrderItem::snapshot_of(
                        &product,
                        line.quantity,
                        line.special_request.clone(),
                    ));
                }
                Err(err) => {
                    if matches!(
                        err,
                        StoreError::Domain(DomainError::InsufficientStock { .. })
                    ) {
                        metrics::counter!("orders_rejected_insufficient_stock").increment(1);
                    }
                    self.release(&reserved).await;
                    return Err(err.into());
                }
            }
        }

        let order = match Order::new(request.customer_name, request.notes, items) {
            Ok(order) => order,
            Err(err) => {
                self.release(&reserved).await;
                return Err(err.into());
            }
        };

        // A persistence failure must not leave decremented stock alongside a
        // never-created order.
        if let Err(err) = self.store.insert_order(&order).await {
            self.release(&reserved).await;
            return Err(err.into());
        }

        metrics::counter!("orders_created").increment(1);
        tracing::info!(order_id = %order.id(), total = %order.total(), "order created");

        self.kitchen.publish(&order);
        Ok(order)
    }

    /// Moves an order to a new status.
    ///
    /// Cancelling an order whose items have not left the kitchen (Pending or
    /// Preparing) restores each item's quantity to its product's stock.
    #[tracing::instrument(skip(self))]
    pub async fn update_status(
        &self,
        order_id: OrderId,
        target: OrderStatus,
    ) -> Result<Order, WorkflowError> {
        let mut order = self.store.get_order(order_id).await?;
        let previous = order.status();

        let restock = target == OrderStatus::Cancelled && order.can_be_cancelled();
        order.transition_to(target)?;

        if restock {
            for item in order.items() {
                self.store
                    .increase_stock(item.product_id, item.quantity)
                    .await?;
            }
            tracing::info!(order_id = %order_id, "stock restored for cancelled order");
        }

        self.store.update_order(&order).await?;
        tracing::info!(order_id = %order_id, from = %previous, to = %target, "order status updated");

        match target {
            OrderStatus::Completed => metrics::counter!("orders_completed").increment(1),
            OrderStatus::Cancelled => metrics::counter!("orders_cancelled").increment(1),
            _ => {}
        }

        self.kitchen.publish(&order);
        Ok(order)
    }

    /// Fetches one order.
    pub async fn get_order(&self, order_id: OrderId) -> Result<Order, WorkflowError> {
        Ok(self.store.get_order(order_id).await?)
    }

    /// Orders the kitchen still has to serve, oldest first.
    pub async fn active_orders(&self) -> Result<Vec<Order>, WorkflowError> {
        Ok(self.store.active_orders().await?)
    }

    /// The ten most recently created orders, newest first.
    pub async fn recent_orders(&self) -> Result<Vec<Order>, WorkflowError> {
        Ok(self.store.recent_orders(RECENT_ORDER_LIMIT).await?)
    }

    /// Order history for one customer label, newest first.
    pub async fn orders_for_customer(&self, customer: &str) -> Result<Vec<Order>, WorkflowError> {
        Ok(self.store.orders_for_customer(customer).await?)
    }

    /// Compensates already-applied decrements after a mid-request failure.
    async fn release(&self, reserved: &[(ProductId, u32)]) {
        for (product_id, quantity) in reserved {
            if let Err(err) = self.store.increase_stock(*product_id, *quantity).await {
                // The product row vanished mid-request; nothing left to
                // restore, but it must not mask the original failure.
                tracing::error!(product_id = %product_id, error = %err, "stock rollback failed");
            }
        }
    }
}
