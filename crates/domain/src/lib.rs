//! Domain layer for the cafe ordering system.
//!
//! This crate provides the core domain types:
//! - Product with its food/drink variants and stock counter
//! - Order aggregate with owned line items and computed total
//! - OrderStatus state machine
//! - Payment records and gateway reference parsing
//!
//! Everything here is pure data and logic; persistence and orchestration
//! live in the `store` and `workflow` crates.

pub mod error;
pub mod money;
pub mod order;
pub mod payment;
pub mod product;
pub mod status;

pub use error::DomainError;
pub use money::Money;
pub use order::{Order, OrderItem};
pub use payment::{Payment, PaymentMethod, PaymentStatus, external_ref, parse_external_ref};
pub use product::{Product, ProductKind, discounted_price};
pub use status::OrderStatus;
