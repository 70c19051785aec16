//! Availability service functions with database access.

use chrono::Local;
use sqlx::PgPool;
use tracing::warn;

use crate::db::queries;

use super::resolver::AvailabilitySnapshot;

/// Build a fresh snapshot of occupied slots from the store.
///
/// A failed booking query degrades to "no known bookings" so the booking
/// form stays usable; availability is advisory, not a hard gate.
pub async fn current_snapshot(pool: &PgPool) -> AvailabilitySnapshot {
    let now = Local::now().naive_local();
    match queries::occupying_slot_bookings(pool, now.date()).await {
        Ok(bookings) => AvailabilitySnapshot::new(bookings, now),
        Err(e) => {
            warn!("Failed to fetch booked slots, treating all slots as free: {}", e);
            AvailabilitySnapshot::empty()
        }
    }
}
