//! The persistence trait consumed by the workflow layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{OrderId, ProductId};
use domain::{Money, Order, Payment, Product};

use crate::error::Result;

/// Persistence operations for products, orders, and payments.
///
/// Implementations must make [`decrease_stock`](CafeStore::decrease_stock) a
/// single atomic check-and-decrement: two concurrent decrements on the same
/// product must never drive stock negative.
#[async_trait]
pub trait CafeStore: Send + Sync {
    // -- Products --

    /// Inserts a new product record.
    async fn insert_product(&self, product: &Product) -> Result<()>;

    /// Replaces an existing product record.
    async fn update_product(&self, product: &Product) -> Result<()>;

    /// Fetches a product by id.
    async fn get_product(&self, id: ProductId) -> Result<Product>;

    /// Lists every product, including unavailable ones.
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// Deletes a product record.
    async fn delete_product(&self, id: ProductId) -> Result<()>;

    /// Returns the number of product records. Used to decide whether to seed.
    async fn count_products(&self) -> Result<u64>;

    /// Atomically decrements stock, failing closed with
    /// [`domain::DomainError::InsufficientStock`] when `quantity` exceeds the
    /// quantity on hand. Returns the product after the decrement.
    async fn decrease_stock(&self, id: ProductId, quantity: u32) -> Result<Product>;

    /// Unconditionally increments stock. Returns the product after the
    /// increment.
    async fn increase_stock(&self, id: ProductId, quantity: u32) -> Result<Product>;

    // -- Orders --

    /// Inserts an order together with its items in one logical unit.
    async fn insert_order(&self, order: &Order) -> Result<()>;

    /// Persists an order's mutable fields (status, payment link).
    async fn update_order(&self, order: &Order) -> Result<()>;

    /// Fetches an order by id.
    async fn get_order(&self, id: OrderId) -> Result<Order>;

    /// Orders that still need kitchen attention, oldest first (the kitchen
    /// serves in FIFO order).
    async fn active_orders(&self) -> Result<Vec<Order>>;

    /// The `limit` most recently created orders, newest first.
    async fn recent_orders(&self, limit: usize) -> Result<Vec<Order>>;

    /// Orders for a customer label, newest first.
    async fn orders_for_customer(&self, customer: &str) -> Result<Vec<Order>>;

    /// Sum of totals over completed orders created in `[start, end)`.
    /// Returns zero when nothing matches.
    async fn revenue_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Money>;

    // -- Payments --

    /// Inserts a payment record.
    async fn insert_payment(&self, payment: &Payment) -> Result<()>;

    /// Replaces an existing payment record.
    async fn update_payment(&self, payment: &Payment) -> Result<()>;

    /// Fetches the payment linked to an order.
    async fn payment_for_order(&self, order_id: OrderId) -> Result<Payment>;
}
