//! Order status state machine.

use serde::{Deserialize, Serialize};

/// The status of an order in its lifecycle.
///
/// Transitions:
/// ```text
/// Pending ──► Preparing ──► Ready ──► Completed
///    │            │
///    └────────────┴──► Cancelled
/// ```
///
/// Completed and Cancelled are terminal. Every other pair is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order has been created but not yet acknowledged by the kitchen.
    #[default]
    Pending,

    /// Kitchen has started preparing the order.
    Preparing,

    /// Order is ready for pickup.
    Ready,

    /// Order has been handed to the customer (terminal).
    Completed,

    /// Order was cancelled before completion (terminal).
    Cancelled,
}

impl OrderStatus {
    /// Returns true if the order may move from this status to `target`.
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        use OrderStatus::*;
        match self {
            Pending => matches!(target, Preparing | Cancelled),
            Preparing => matches!(target, Ready | Cancelled),
            Ready => matches!(target, Completed),
            Completed | Cancelled => false,
        }
    }

    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::Ready => "Ready",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
