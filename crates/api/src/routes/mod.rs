pub mod health;
pub mod kitchen;
pub mod metrics;
pub mod orders;
pub mod payments;
pub mod products;
pub mod revenue;
