//! Menu products and stock accounting.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::money::Money;

/// Kind-specific attributes of a menu product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProductKind {
    /// Food items track whether they are vegetarian.
    Food { vegetarian: bool },
    /// Drinks track whether they are served cold and an optional size label.
    Drink { cold: bool, size: Option<String> },
}

impl ProductKind {
    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::Food { .. } => "Food",
            ProductKind::Drink { .. } => "Drink",
        }
    }
}

/// A product on the cafe menu with its quantity-on-hand counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,

    /// Product name shown on the menu.
    pub name: String,

    /// Unit price. Never negative.
    pub price: Money,

    /// Quantity on hand. Unsigned, so it can never be persisted negative.
    pub stock: u32,

    /// Optional product description.
    pub description: Option<String>,

    /// Optional URL to a product image.
    pub image_url: Option<String>,

    /// Whether the product is currently offered for ordering.
    pub available: bool,

    /// Food/drink variant data.
    pub kind: ProductKind,

    /// Seasonal discount percentage in `[0, 1]`.
    pub discount_percentage: f64,
}

impl Product {
    /// Creates a new available product with no discount.
    ///
    /// Fails with [`DomainError::InvalidPrice`] if the price is negative.
    pub fn new(
        name: impl Into<String>,
        price: Money,
        stock: u32,
        kind: ProductKind,
    ) -> Result<Self, DomainError> {
        if price.is_negative() {
            return Err(DomainError::InvalidPrice {
                cents: price.cents(),
            });
        }

        Ok(Self {
            id: ProductId::new(),
            name: name.into(),
            price,
            stock,
            description: None,
            image_url: None,
            available: true,
            kind,
            discount_percentage: 0.0,
        })
    }

    /// Returns true if at least `quantity` units are on hand.
    pub fn has_stock(&self, quantity: u32) -> bool {
        self.stock >= quantity
    }

    /// Decreases stock by `quantity`, failing closed if the request exceeds
    /// the quantity on hand.
    pub fn decrease_stock(&mut self, quantity: u32) -> Result<(), DomainError> {
        if quantity > self.stock {
            return Err(DomainError::InsufficientStock {
                product: self.name.clone(),
                requested: quantity,
                available: self.stock,
            });
        }
        self.stock -= quantity;
        Ok(())
    }

    /// Increases stock by `quantity`. Used for restocking and when a
    /// cancelled order returns its items.
    pub fn increase_stock(&mut self, quantity: u32) {
        self.stock += quantity;
    }

    /// Sets the discount percentage, clamping to `[0, 1]`.
    pub fn set_discount(&mut self, percentage: f64) {
        self.discount_percentage = percentage.clamp(0.0, 1.0);
    }

    /// Returns the price after applying the current discount.
    pub fn discounted_price(&self) -> Money {
        discounted_price(self.price, self.discount_percentage)
    }
}

/// Computes a discounted price from a base price and a discount percentage.
///
/// This is the same computation for every product kind; discounts are not
/// variant-specific.
pub fn discounted_price(price: Money, percentage: f64) -> Money {
    let pct = percentage.clamp(0.0, 1.0);
    let cents = (price.cents() as f64 * (1.0 - pct)).round() as i64;
    Money::from_cents(cents)
}
