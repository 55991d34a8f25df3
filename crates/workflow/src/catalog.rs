//! Thin product CRUD over the store.

use std::sync::Arc;

use common::ProductId;
use domain::{Money, Product, ProductKind};
use serde::Deserialize;
use store::CafeStore;

use crate::error::WorkflowError;

/// Input for creating a menu product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price_cents: i64,
    pub stock: u32,
    pub kind: ProductKind,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Admin-facing product management.
pub struct ProductCatalog<S> {
    store: Arc<S>,
}

impl<S: CafeStore> ProductCatalog<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Creates and persists a new product.
    #[tracing::instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create(&self, new: NewProduct) -> Result<Product, WorkflowError> {
        let mut product = Product::new(
            new.name,
            Money::from_cents(new.price_cents),
            new.stock,
            new.kind,
        )?;
        product.description = new.description;
        product.image_url = new.image_url;

        self.store.insert_product(&product).await?;
        tracing::info!(product_id = %product.id, "product created");
        Ok(product)
    }

    pub async fn get(&self, id: ProductId) -> Result<Product, WorkflowError> {
        Ok(self.store.get_product(id).await?)
    }

    /// Every product, including ones hidden from the menu.
    pub async fn list_all(&self) -> Result<Vec<Product>, WorkflowError> {
        Ok(self.store.list_products().await?)
    }

    /// Only products currently offered for ordering.
    pub async fn list_available(&self) -> Result<Vec<Product>, WorkflowError> {
        let products = self.store.list_products().await?;
        Ok(products.into_iter().filter(|p| p.available).collect())
    }

    pub async fn save(&self, product: &Product) -> Result<(), WorkflowError> {
        Ok(self.store.update_product(product).await?)
    }

    pub async fn delete(&self, id: ProductId) -> Result<(), WorkflowError> {
        self.store.delete_product(id).await?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    /// Sets a product's seasonal discount, clamped to `[0, 1]`.
    pub async fn set_discount(&self, id: ProductId, percentage: f64) -> Result<Product, WorkflowError> {
        let mut product = self.store.get_product(id).await?;
        product.set_discount(percentage);
        self.store.update_product(&product).await?;
        Ok(product)
    }

    /// Products with stock below `threshold`, for inventory alerts.
    pub async fn low_stock(&self, threshold: u32) -> Result<Vec<Product>, WorkflowError> {
        let products = self.store.list_products().await?;
        Ok(products
            .into_iter()
            .filter(|p| p.stock < threshold)
            .collect())
    }
}
