//! Pricing engine module.
//!
//! Deterministic quote pricing from a configurable rate table: flat price per
//! cleaning type, additive room prices, flat extras, per-person laundry, and
//! a frequency discount off the subtotal.

pub mod calculators;
pub mod config;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{calculate, round_money, CalculatedPrice, ServiceRequest};
pub use config::{default_pricing, PricingConfig, FALLBACK_TYPE_PRICE};
pub use routes::router;
