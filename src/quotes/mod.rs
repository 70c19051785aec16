//! Quote intake and admin booking management.

pub mod requests;
pub mod routes;
pub mod services;

pub use routes::{admin_router, router};
