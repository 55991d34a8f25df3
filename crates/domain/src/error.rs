//! Domain error types.

use thiserror::Error;

use crate::status::OrderStatus;

/// Errors raised by domain rules.
///
/// These are business-rule rejections, not transient failures; callers must
/// not retry them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Requested quantity exceeds the quantity on hand.
    #[error("insufficient stock for '{product}': requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        requested: u32,
        available: u32,
    },

    /// Status change not permitted by the order state machine.
    #[error("cannot transition order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// An order must contain at least one item.
    #[error("order has no items")]
    NoItems,

    /// Item quantity must be at least 1.
    #[error("invalid quantity: {quantity} (must be at least 1)")]
    InvalidQuantity { quantity: u32 },

    /// Unit price must not be negative.
    #[error("invalid price: {cents} cents (must not be negative)")]
    InvalidPrice { cents: i64 },

    /// A gateway callback carried a reference we cannot parse.
    #[error("invalid external reference: {0}")]
    InvalidReference(String),
}
