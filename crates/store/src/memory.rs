use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{OrderId, ProductId};
use domain::{Money, Order, OrderStatus, Payment, Product};
use tokio::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::store::CafeStore;

#[derive(Default)]
struct Inner {
    products: HashMap<ProductId, Product>,
    orders: HashMap<OrderId, Order>,
    payments: HashMap<OrderId, Payment>,
}

/// In-memory cafe store.
///
/// Used by the test suites and as the default backend when no database is
/// configured. All state sits behind one `RwLock`, so the compound
/// check-and-decrement in [`decrease_stock`](CafeStore::decrease_stock) runs
/// under a single write lock and cannot race.
#[derive(Clone, Default)]
pub struct InMemoryCafeStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryCafeStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every record. Test helper.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.products.clear();
        inner.orders.clear();
        inner.payments.clear();
    }
}

#[async_trait]
impl CafeStore for InMemoryCafeStore {
    async fn insert_product(&self, product: &Product) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.products.insert(product.id, product.clone());
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        let mut inner = self.inner.write().await;
        if !inner.products.contains_key(&product.id) {
            return Err(StoreError::ProductNotFound(product.id));
        }
        inner.products.insert(product.id, product.clone());
        Ok(())
    }

    async fn get_product(&self, id: ProductId) -> Result<Product> {
        let inner = self.inner.read().await;
        inner
            .products
            .get(&id)
            .cloned()
            .ok_or(StoreError::ProductNotFound(id))
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let inner = self.inner.read().await;
        let mut products: Vec<_> = inner.products.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn delete_product(&self, id: ProductId) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::ProductNotFound(id))
    }

    async fn count_products(&self) -> Result<u64> {
        let inner = self.inner.read().await;
        Ok(inner.products.len() as u64)
    }

    async fn decrease_stock(&self, id: ProductId, quantity: u32) -> Result<Product> {
        // Single write lock for the whole read-check-decrement.
        let mut inner = self.inner.write().await;
        let product = inner
            .products
            .get_mut(&id)
            .ok_or(StoreError::ProductNotFound(id))?;
        product.decrease_stock(quantity)?;
        tracing::debug!(product_id = %id, quantity, remaining = product.stock, "stock decreased");
        Ok(product.clone())
    }

    async fn increase_stock(&self, id: ProductId, quantity: u32) -> Result<Product> {
        let mut inner = self.inner.write().await;
        let product = inner
            .products
            .get_mut(&id)
            .ok_or(StoreError::ProductNotFound(id))?;
        product.increase_stock(quantity);
        tracing::debug!(product_id = %id, quantity, remaining = product.stock, "stock increased");
        Ok(product.clone())
    }

    async fn insert_order(&self, order: &Order) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.orders.insert(order.id(), order.clone());
        Ok(())
    }

    async fn update_order(&self, order: &Order) -> Result<()> {
        let mut inner = self.inner.write().await;
        if !inner.orders.contains_key(&order.id()) {
            return Err(StoreError::OrderNotFound(order.id()));
        }
        inner.orders.insert(order.id(), order.clone());
        Ok(())
    }

    async fn get_order(&self, id: OrderId) -> Result<Order> {
        let inner = self.inner.read().await;
        inner
            .orders
            .get(&id)
            .cloned()
            .ok_or(StoreError::OrderNotFound(id))
    }

    async fn active_orders(&self) -> Result<Vec<Order>> {
        let inner = self.inner.read().await;
        let mut orders: Vec<_> = inner
            .orders
            .values()
            .filter(|o| o.is_active())
            .cloned()
            .collect();
        orders.sort_by_key(Order::created_at);
        Ok(orders)
    }

    async fn recent_orders(&self, limit: usize) -> Result<Vec<Order>> {
        let inner = self.inner.read().await;
        let mut orders: Vec<_> = inner.orders.values().cloned().collect();
        orders.sort_by_key(|o| std::cmp::Reverse(o.created_at()));
        orders.truncate(limit);
        Ok(orders)
    }

    async fn orders_for_customer(&self, customer: &str) -> Result<Vec<Order>> {
        let inner = self.inner.read().await;
        let mut orders: Vec<_> = inner
            .orders
            .values()
            .filter(|o| o.customer_name() == Some(customer))
            .cloned()
            .collect();
        orders.sort_by_key(|o| std::cmp::Reverse(o.created_at()));
        Ok(orders)
    }

    async fn revenue_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Money> {
        let inner = self.inner.read().await;
        let total = inner
            .orders
            .values()
            .filter(|o| o.status() == OrderStatus::Completed)
            .filter(|o| o.created_at() >= start && o.created_at() < end)
            .map(Order::total)
            .sum();
        Ok(total)
    }

    async fn insert_payment(&self, payment: &Payment) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.payments.insert(payment.order_id, payment.clone());
        Ok(())
    }

    async fn update_payment(&self, payment: &Payment) -> Result<()> {
        let mut inner = self.inner.write().await;
        if !inner.payments.contains_key(&payment.order_id) {
            return Err(StoreError::PaymentNotFound(payment.order_id));
        }
        inner.payments.insert(payment.order_id, payment.clone());
        Ok(())
    }

    async fn payment_for_order(&self, order_id: OrderId) -> Result<Payment> {
        let inner = self.inner.read().await;
        inner
            .payments
            .get(&order_id)
            .cloned()
            .ok_or(StoreError::PaymentNotFound(order_id))
    }
}
