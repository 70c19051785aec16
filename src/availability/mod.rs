//! Slot availability module.
//!
//! Derives per-date availability from existing non-cancelled bookings over a
//! fixed 11-slot business day, filtering out slots that have already elapsed
//! for today.

pub mod resolver;
pub mod routes;
pub mod services;

pub use resolver::{
    daily_slots, AvailabilitySnapshot, DateAvailability, SlotBooking, LIMITED_THRESHOLD,
    TOTAL_DAILY_SLOTS,
};
pub use routes::router;
