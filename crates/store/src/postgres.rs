use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{OrderId, PaymentId, ProductId};
use domain::{Money, Order, OrderItem, OrderStatus, Payment, PaymentMethod, PaymentStatus, Product, ProductKind};
use domain::DomainError;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::store::CafeStore;

/// PostgreSQL-backed cafe store.
///
/// Stock reservation uses a single conditional update
/// (`stock = stock - qty WHERE stock >= qty`, checking rows affected), so
/// concurrent order creation cannot drive stock negative.
#[derive(Clone)]
pub struct PgCafeStore {
    pool: PgPool,
}

impl PgCafeStore {
    /// Creates a new store over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the tables if they do not exist yet.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                price_cents BIGINT NOT NULL,
                stock BIGINT NOT NULL CHECK (stock >= 0),
                description TEXT,
                image_url TEXT,
                available BOOLEAN NOT NULL,
                kind JSONB NOT NULL,
                discount_percentage DOUBLE PRECISION NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS orders (
                id UUID PRIMARY KEY,
                created_at TIMESTAMPTZ NOT NULL,
                status TEXT NOT NULL,
                customer_name TEXT,
                notes TEXT,
                items JSONB NOT NULL,
                total_cents BIGINT NOT NULL,
                payment_id UUID
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS payments (
                order_id UUID PRIMARY KEY,
                id UUID NOT NULL,
                amount_cents BIGINT NOT NULL,
                method TEXT NOT NULL,
                status TEXT NOT NULL,
                transaction_id TEXT NOT NULL UNIQUE,
                paid_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn row_to_product(row: &PgRow) -> Result<Product> {
        let kind: ProductKind = serde_json::from_value(row.try_get("kind")?)?;
        Ok(Product {
            id: ProductId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            price: Money::from_cents(row.try_get("price_cents")?),
            stock: row.try_get::<i64, _>("stock")? as u32,
            description: row.try_get("description")?,
            image_url: row.try_get("image_url")?,
            available: row.try_get("available")?,
            kind,
            discount_percentage: row.try_get("discount_percentage")?,
        })
    }

    fn row_to_order(row: &PgRow) -> Result<Order> {
        let items: Vec<OrderItem> = serde_json::from_value(row.try_get("items")?)?;
        let status: OrderStatus =
            serde_json::from_value(serde_json::Value::String(row.try_get("status")?))?;
        let payment_id = row
            .try_get::<Option<Uuid>, _>("payment_id")?
            .map(PaymentId::from_uuid);

        Ok(Order::from_parts(
            OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            row.try_get("created_at")?,
            status,
            row.try_get("customer_name")?,
            row.try_get("notes")?,
            items,
            payment_id,
        ))
    }

    fn row_to_payment(row: &PgRow) -> Result<Payment> {
        let method: PaymentMethod =
            serde_json::from_value(serde_json::Value::String(row.try_get("method")?))?;
        let status: PaymentStatus =
            serde_json::from_value(serde_json::Value::String(row.try_get("status")?))?;

        Ok(Payment {
            id: PaymentId::from_uuid(row.try_get::<Uuid, _>("id")?),
            order_id: OrderId::from_uuid(row.try_get::<Uuid, _>("order_id")?),
            amount: Money::from_cents(row.try_get("amount_cents")?),
            method,
            status,
            transaction_id: row.try_get("transaction_id")?,
            paid_at: row.try_get("paid_at")?,
        })
    }
}

const PRODUCT_COLUMNS: &str =
    "id, name, price_cents, stock, description, image_url, available, kind, discount_percentage";
const ORDER_COLUMNS: &str =
    "id, created_at, status, customer_name, notes, items, total_cents, payment_id";

fn method_as_str(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Cash => "Cash",
        PaymentMethod::Qr => "Qr",
        PaymentMethod::EWallet => "EWallet",
        PaymentMethod::Card => "Card",
    }
}

fn payment_status_as_str(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "Pending",
        PaymentStatus::Completed => "Completed",
        PaymentStatus::Failed => "Failed",
        PaymentStatus::Refunded => "Refunded",
    }
}

#[async_trait]
impl CafeStore for PgCafeStore {
    async fn insert_product(&self, product: &Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, price_cents, stock, description, image_url, available, kind, discount_percentage)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(product.price.cents())
        .bind(i64::from(product.stock))
        .bind(&product.description)
        .bind(&product.image_url)
        .bind(product.available)
        .bind(serde_json::to_value(&product.kind)?)
        .bind(product.discount_percentage)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, price_cents = $3, stock = $4, description = $5,
                image_url = $6, available = $7, kind = $8, discount_percentage = $9
            WHERE id = $1
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(product.price.cents())
        .bind(i64::from(product.stock))
        .bind(&product.description)
        .bind(&product.image_url)
        .bind(product.available)
        .bind(serde_json::to_value(&product.kind)?)
        .bind(product.discount_percentage)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::ProductNotFound(product.id));
        }
        Ok(())
    }

    async fn get_product(&self, id: ProductId) -> Result<Product> {
        let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::ProductNotFound(id))?;
        Self::row_to_product(&row)
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::row_to_product).collect()
    }

    async fn delete_product(&self, id: ProductId) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::ProductNotFound(id));
        }
        Ok(())
    }

    async fn count_products(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn decrease_stock(&self, id: ProductId, quantity: u32) -> Result<Product> {
        // Atomic conditional decrement; zero rows affected means either the
        // product is missing or the stock check failed.
        let row = sqlx::query(&format!(
            "UPDATE products SET stock = stock - $2 WHERE id = $1 AND stock >= $2 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(i64::from(quantity))
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            let product = Self::row_to_product(&row)?;
            tracing::debug!(product_id = %id, quantity, remaining = product.stock, "stock decreased");
            return Ok(product);
        }

        let existing = sqlx::query("SELECT name, stock FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::ProductNotFound(id))?;

        Err(StoreError::Domain(DomainError::InsufficientStock {
            product: existing.try_get("name")?,
            requested: quantity,
            available: existing.try_get::<i64, _>("stock")? as u32,
        }))
    }

    async fn increase_stock(&self, id: ProductId, quantity: u32) -> Result<Product> {
        let row = sqlx::query(&format!(
            "UPDATE products SET stock = stock + $2 WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(i64::from(quantity))
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::ProductNotFound(id))?;
        let product = Self::row_to_product(&row)?;
        tracing::debug!(product_id = %id, quantity, remaining = product.stock, "stock increased");
        Ok(product)
    }

    async fn insert_order(&self, order: &Order) -> Result<()> {
        // One statement carries the order and its items (as JSONB), so they
        // land in one logical unit.
        sqlx::query(
            r#"
            INSERT INTO orders (id, created_at, status, customer_name, notes, items, total_cents, payment_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(order.id().as_uuid())
        .bind(order.created_at())
        .bind(order.status().as_str())
        .bind(order.customer_name())
        .bind(order.notes())
        .bind(serde_json::to_value(order.items())?)
        .bind(order.total().cents())
        .bind(order.payment_id().map(|p| p.as_uuid()))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_order(&self, order: &Order) -> Result<()> {
        // Items are immutable after creation; only status and the payment
        // link ever change.
        let result = sqlx::query("UPDATE orders SET status = $2, payment_id = $3 WHERE id = $1")
            .bind(order.id().as_uuid())
            .bind(order.status().as_str())
            .bind(order.payment_id().map(|p| p.as_uuid()))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::OrderNotFound(order.id()));
        }
        Ok(())
    }

    async fn get_order(&self, id: OrderId) -> Result<Order> {
        let row = sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::OrderNotFound(id))?;
        Self::row_to_order(&row)
    }

    async fn active_orders(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE status NOT IN ('Completed', 'Cancelled')
             ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::row_to_order).collect()
    }

    async fn recent_orders(&self, limit: usize) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::row_to_order).collect()
    }

    async fn orders_for_customer(&self, customer: &str) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_name = $1 ORDER BY created_at DESC"
        ))
        .bind(customer)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::row_to_order).collect()
    }

    async fn revenue_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Money> {
        let cents: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total_cents), 0) FROM orders
            WHERE status = 'Completed' AND created_at >= $1 AND created_at < $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;
        Ok(Money::from_cents(cents))
    }

    async fn insert_payment(&self, payment: &Payment) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (order_id, id, amount_cents, method, status, transaction_id, paid_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (order_id) DO UPDATE
            SET id = $2, amount_cents = $3, method = $4, status = $5,
                transaction_id = $6, paid_at = $7
            "#,
        )
        .bind(payment.order_id.as_uuid())
        .bind(payment.id.as_uuid())
        .bind(payment.amount.cents())
        .bind(method_as_str(payment.method))
        .bind(payment_status_as_str(payment.status))
        .bind(&payment.transaction_id)
        .bind(payment.paid_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_payment(&self, payment: &Payment) -> Result<()> {
        let result = sqlx::query(
            "UPDATE payments SET status = $2, transaction_id = $3 WHERE order_id = $1",
        )
        .bind(payment.order_id.as_uuid())
        .bind(payment_status_as_str(payment.status))
        .bind(&payment.transaction_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::PaymentNotFound(payment.order_id));
        }
        Ok(())
    }

    async fn payment_for_order(&self, order_id: OrderId) -> Result<Payment> {
        let row = sqlx::query(
            "SELECT order_id, id, amount_cents, method, status, transaction_id, paid_at
             FROM payments WHERE order_id = $1",
        )
        .bind(order_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::PaymentNotFound(order_id))?;
        Self::row_to_payment(&row)
    }
}
