//! Persistence layer for the cafe ordering system.
//!
//! The [`CafeStore`] trait covers products (including atomic stock
//! reservation), orders with their owned items, payments, and the
//! completed-order revenue query. Two implementations are provided:
//! [`InMemoryCafeStore`] for tests and the default server, and
//! [`PgCafeStore`] backed by PostgreSQL via sqlx.

mod error;
mod memory;
mod postgres;
mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryCafeStore;
pub use postgres::PgCafeStore;
pub use store::CafeStore;
