//! Order aggregate and its line items.

use chrono::{DateTime, Utc};
use common::{OrderId, PaymentId, ProductId};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::money::Money;
use crate::product::Product;
use crate::status::OrderStatus;

/// A single line item in an order.
///
/// The unit price is captured at order time and stays fixed even if the
/// product's live price changes later. The product itself is referenced by
/// identity, never embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// The product this line refers to.
    pub product_id: ProductId,

    /// Product name snapshot for display.
    pub product_name: String,

    /// Quantity ordered. At least 1.
    pub quantity: u32,

    /// Price per unit at the time of order.
    pub unit_price: Money,

    /// Optional special request, e.g. "no ice".
    pub special_request: Option<String>,
}

impl OrderItem {
    /// Creates a line item snapshotting the product's current price.
    pub fn snapshot_of(product: &Product, quantity: u32, special_request: Option<String>) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity,
            unit_price: product.price,
            special_request,
        }
    }

    /// Returns the subtotal for this line (unit price × quantity).
    pub fn subtotal(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// Order aggregate root.
///
/// Owns its line items exclusively: items live and die with the order and are
/// immutable after creation. The total is computed from the items and the two
/// can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    created_at: DateTime<Utc>,
    status: OrderStatus,
    customer_name: Option<String>,
    notes: Option<String>,
    items: Vec<OrderItem>,
    total: Money,
    payment_id: Option<PaymentId>,
}

impl Order {
    /// Creates a new order in `Pending` status.
    ///
    /// Fails with [`DomainError::NoItems`] on an empty item list and
    /// [`DomainError::InvalidQuantity`] if any line has quantity 0.
    pub fn new(
        customer_name: Option<String>,
        notes: Option<String>,
        items: Vec<OrderItem>,
    ) -> Result<Self, DomainError> {
        if items.is_empty() {
            return Err(DomainError::NoItems);
        }
        for item in &items {
            if item.quantity == 0 {
                return Err(DomainError::InvalidQuantity {
                    quantity: item.quantity,
                });
            }
        }

        let total = items.iter().map(OrderItem::subtotal).sum();

        Ok(Self {
            id: OrderId::new(),
            created_at: Utc::now(),
            status: OrderStatus::Pending,
            customer_name,
            notes,
            items,
            total,
            payment_id: None,
        })
    }

    /// Rehydrates an order from persisted parts.
    ///
    /// The total is recomputed from the items rather than trusted from
    /// storage, keeping the total/items invariant intact.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: OrderId,
        created_at: DateTime<Utc>,
        status: OrderStatus,
        customer_name: Option<String>,
        notes: Option<String>,
        items: Vec<OrderItem>,
        payment_id: Option<PaymentId>,
    ) -> Self {
        let total = items.iter().map(OrderItem::subtotal).sum();
        Self {
            id,
            created_at,
            status,
            customer_name,
            notes,
            items,
            total,
            payment_id,
        }
    }

    /// Moves the order to `target`, enforcing the state machine.
    pub fn transition_to(&mut self, target: OrderStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        Ok(())
    }

    /// Links a payment record to this order.
    pub fn attach_payment(&mut self, payment_id: PaymentId) {
        self.payment_id = Some(payment_id);
    }

    /// Returns true if cancelling would return the items to stock.
    ///
    /// Only orders whose items have not yet left the kitchen qualify.
    pub fn can_be_cancelled(&self) -> bool {
        matches!(self.status, OrderStatus::Pending | OrderStatus::Preparing)
    }

    /// Returns true if the order still needs kitchen attention.
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.customer_name.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn payment_id(&self) -> Option<PaymentId> {
        self.payment_id
    }

    /// Total number of units across all lines.
    pub fn total_item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}
