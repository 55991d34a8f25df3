//! Payment records and gateway reference handling.

use chrono::{DateTime, Utc};
use common::{OrderId, PaymentId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::money::Money;

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Qr,
    EWallet,
    Card,
}

/// Lifecycle of a payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Refunded,
}

/// A payment linked one-to-one with an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub amount: Money,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// Transaction reference: `TRX-…` for internal payments, the gateway's
    /// external reference for asynchronous ones.
    pub transaction_id: String,
    pub paid_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a completed payment for an internally processed transaction.
    pub fn completed(order_id: OrderId, amount: Money, method: PaymentMethod) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self {
            id: PaymentId::new(),
            order_id,
            amount,
            method,
            status: PaymentStatus::Completed,
            transaction_id: format!("TRX-{}", suffix[..8].to_uppercase()),
            paid_at: Utc::now(),
        }
    }

    /// Creates a pending payment awaiting a gateway callback.
    pub fn pending(order_id: OrderId, amount: Money, method: PaymentMethod, reference: String) -> Self {
        Self {
            id: PaymentId::new(),
            order_id,
            amount,
            method,
            status: PaymentStatus::Pending,
            transaction_id: reference,
            paid_at: Utc::now(),
        }
    }
}

/// Builds the external reference sent to the payment gateway for an order.
///
/// Format: `SC-{order id}-{5 char suffix}`. The suffix keeps retried invoices
/// for the same order distinct on the gateway side.
pub fn external_ref(order_id: OrderId) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("SC-{}-{}", order_id, &suffix[..5])
}

/// Parses the order id back out of a gateway callback reference.
pub fn parse_external_ref(reference: &str) -> Result<OrderId, DomainError> {
    let invalid = || DomainError::InvalidReference(reference.to_string());

    let rest = reference.strip_prefix("SC-").ok_or_else(invalid)?;
    // The order id is a hyphenated UUID; the suffix is the part after the
    // last hyphen.
    let (id_part, suffix) = rest.rsplit_once('-').ok_or_else(invalid)?;
    if suffix.is_empty() {
        return Err(invalid());
    }
    OrderId::parse(id_part).map_err(|_| invalid())
}
