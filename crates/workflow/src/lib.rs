//! Orchestration layer for the cafe ordering system.
//!
//! The [`OrderWorkflow`] is the core: it validates requested line items
//! against inventory, reserves stock, persists the order, and pushes the
//! resulting snapshot to the kitchen dashboard via the
//! [`KitchenBroadcaster`]. The remaining components are thin collaborators:
//! product catalog CRUD, payment processing, and revenue reporting.

pub mod catalog;
pub mod error;
pub mod kitchen;
pub mod orders;
pub mod payments;
pub mod revenue;
pub mod seed;

pub use catalog::{NewProduct, ProductCatalog};
pub use error::WorkflowError;
pub use kitchen::{KITCHEN_TOPIC, KitchenBroadcaster};
pub use orders::{OrderLine, OrderRequest, OrderWorkflow, RECENT_ORDER_LIMIT};
pub use payments::{Invoice, PaymentGateway, PaymentProcessor, SimulatedGateway};
pub use revenue::RevenueReport;
pub use seed::seed_products;
