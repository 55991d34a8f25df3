//! Store error types.

use common::{OrderId, ProductId};
use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Product id has no matching record.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// Order id has no matching record.
    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    /// No payment record for the given order.
    #[error("payment not found for order: {0}")]
    PaymentNotFound(OrderId),

    /// A domain rule was violated while mutating stored state, e.g. an
    /// insufficient-stock rejection during a conditional decrement.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored payload could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
