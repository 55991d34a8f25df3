//! Shared identifier types for the cafe ordering system.
//!
//! Every entity gets its own UUID newtype so order, product, and payment
//! identifiers cannot be mixed up at compile time.

mod ids;

pub use ids::{OrderId, PaymentId, ProductId};
