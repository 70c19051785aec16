//! Slot availability decision logic.
//!
//! Pure functions over a snapshot of existing bookings plus a reference
//! "now". The snapshot is advisory: reads are not serialized against writes,
//! so two clients can still race for the same slot.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::models::QuoteStatus;

/// Business hours run 08:00-18:00 with one bookable slot per hour.
pub const TOTAL_DAILY_SLOTS: usize = 11;

/// At or above this many occupied slots a date shows as limited.
pub const LIMITED_THRESHOLD: usize = 4;

/// The fixed daily slot catalog, 08:00 through 18:00 inclusive.
pub fn daily_slots() -> Vec<NaiveTime> {
    (8..=18)
        .map(|hour| NaiveTime::from_hms_opt(hour, 0, 0).expect("static slot hour"))
        .collect()
}

/// How bookable a calendar date is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DateAvailability {
    Available,
    Limited,
    Full,
}

/// One existing booking's scheduling fields, as read from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotBooking {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: QuoteStatus,
}

/// A point-in-time view of which slots are occupied.
///
/// Construction filters out bookings that do not occupy a slot (cancelled
/// frees it immediately, completed once the service has happened) and slots
/// that have already elapsed relative to `now` - an elapsed slot is simply
/// omitted, it neither shows as booked nor blocks anything.
#[derive(Debug, Clone)]
pub struct AvailabilitySnapshot {
    occupied: BTreeMap<NaiveDate, BTreeSet<NaiveTime>>,
}

impl AvailabilitySnapshot {
    pub fn new(bookings: impl IntoIterator<Item = SlotBooking>, now: NaiveDateTime) -> Self {
        let today = now.date();
        let mut occupied: BTreeMap<NaiveDate, BTreeSet<NaiveTime>> = BTreeMap::new();

        for booking in bookings {
            if !booking.status.occupies_slot() {
                continue;
            }
            if booking.date < today {
                continue;
            }
            if booking.date == today && booking.time <= now.time() {
                continue;
            }
            occupied.entry(booking.date).or_default().insert(booking.time);
        }

        Self { occupied }
    }

    /// The degraded snapshot used when the booking query fails: no known
    /// bookings, so availability stays advisory instead of wedging the form.
    pub fn empty() -> Self {
        Self { occupied: BTreeMap::new() }
    }

    /// Times already occupied on a date.
    pub fn booked_times_for_date(&self, date: NaiveDate) -> BTreeSet<NaiveTime> {
        self.occupied.get(&date).cloned().unwrap_or_default()
    }

    pub fn is_slot_booked(&self, date: NaiveDate, time: NaiveTime) -> bool {
        self.occupied
            .get(&date)
            .map(|times| times.contains(&time))
            .unwrap_or(false)
    }

    fn booked_count(&self, date: NaiveDate) -> usize {
        self.occupied.get(&date).map(BTreeSet::len).unwrap_or(0)
    }

    pub fn is_date_fully_booked(&self, date: NaiveDate) -> bool {
        self.booked_count(date) >= TOTAL_DAILY_SLOTS
    }

    pub fn date_availability(&self, date: NaiveDate) -> DateAvailability {
        let booked = self.booked_count(date);
        if booked >= TOTAL_DAILY_SLOTS {
            DateAvailability::Full
        } else if booked >= LIMITED_THRESHOLD {
            DateAvailability::Limited
        } else {
            DateAvailability::Available
        }
    }

    pub fn available_slots_count(&self, date: NaiveDate) -> usize {
        TOTAL_DAILY_SLOTS.saturating_sub(self.booked_count(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn time(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn at(s: &str, h: u32) -> NaiveDateTime {
        date(s).and_time(time(h))
    }

    fn booking(day: &str, hour: u32, status: QuoteStatus) -> SlotBooking {
        SlotBooking { date: date(day), time: time(hour), status }
    }

    fn pending_bookings(day: &str, hours: &[u32]) -> Vec<SlotBooking> {
        hours
            .iter()
            .map(|&h| booking(day, h, QuoteStatus::Pending))
            .collect()
    }

    #[test]
    fn catalog_has_eleven_hourly_slots() {
        let slots = daily_slots();
        assert_eq!(slots.len(), TOTAL_DAILY_SLOTS);
        assert_eq!(slots[0], time(8));
        assert_eq!(slots[10], time(18));
    }

    #[test]
    fn empty_day_is_available_with_full_count() {
        let snapshot = AvailabilitySnapshot::empty();
        let day = date("2026-09-01");
        assert_eq!(snapshot.date_availability(day), DateAvailability::Available);
        assert_eq!(snapshot.available_slots_count(day), TOTAL_DAILY_SLOTS);
        assert!(!snapshot.is_date_fully_booked(day));
    }

    #[test]
    fn three_bookings_still_available_four_is_limited() {
        let now = at("2026-09-01", 7);
        let three = AvailabilitySnapshot::new(pending_bookings("2026-09-02", &[8, 9, 10]), now);
        assert_eq!(three.date_availability(date("2026-09-02")), DateAvailability::Available);

        let four = AvailabilitySnapshot::new(pending_bookings("2026-09-02", &[8, 9, 10, 11]), now);
        assert_eq!(four.date_availability(date("2026-09-02")), DateAvailability::Limited);
        assert_eq!(four.available_slots_count(date("2026-09-02")), 7);
    }

    #[test]
    fn ten_bookings_limited_eleven_full() {
        let now = at("2026-09-01", 7);
        let hours: Vec<u32> = (8..18).collect();
        let ten = AvailabilitySnapshot::new(pending_bookings("2026-09-02", &hours), now);
        assert_eq!(ten.date_availability(date("2026-09-02")), DateAvailability::Limited);
        assert!(!ten.is_date_fully_booked(date("2026-09-02")));

        let hours: Vec<u32> = (8..=18).collect();
        let eleven = AvailabilitySnapshot::new(pending_bookings("2026-09-02", &hours), now);
        assert_eq!(eleven.date_availability(date("2026-09-02")), DateAvailability::Full);
        assert!(eleven.is_date_fully_booked(date("2026-09-02")));
        assert_eq!(eleven.available_slots_count(date("2026-09-02")), 0);
    }

    #[test]
    fn cancelled_and_completed_bookings_free_their_slots() {
        let now = at("2026-09-01", 7);
        let snapshot = AvailabilitySnapshot::new(
            vec![
                booking("2026-09-02", 8, QuoteStatus::Pending),
                booking("2026-09-02", 9, QuoteStatus::Confirmed),
                booking("2026-09-02", 10, QuoteStatus::Cancelled),
                booking("2026-09-02", 11, QuoteStatus::Completed),
            ],
            now,
        );
        let day = date("2026-09-02");
        assert_eq!(snapshot.booked_times_for_date(day).len(), 2);
        assert!(snapshot.is_slot_booked(day, time(8)));
        assert!(!snapshot.is_slot_booked(day, time(10)));
        assert!(!snapshot.is_slot_booked(day, time(11)));
    }

    #[test]
    fn cancelling_a_booking_frees_exactly_one_slot() {
        let now = at("2026-09-01", 7);
        let day = date("2026-09-02");

        let mut bookings = pending_bookings("2026-09-02", &[8, 9, 10, 11]);
        let before = AvailabilitySnapshot::new(bookings.clone(), now);
        assert_eq!(before.available_slots_count(day), 7);

        bookings[0].status = QuoteStatus::Cancelled;
        let after = AvailabilitySnapshot::new(bookings, now);
        assert_eq!(after.available_slots_count(day), 8);
        assert_eq!(after.date_availability(day), DateAvailability::Available);
    }

    #[test]
    fn elapsed_same_day_slots_are_omitted() {
        // At 12:00, the morning slots no longer count as booked.
        let now = at("2026-09-01", 12);
        let snapshot =
            AvailabilitySnapshot::new(pending_bookings("2026-09-01", &[8, 10, 12, 14, 16]), now);
        let today = date("2026-09-01");

        let booked = snapshot.booked_times_for_date(today);
        assert_eq!(booked, BTreeSet::from([time(14), time(16)]));
        assert!(!snapshot.is_slot_booked(today, time(8)));
        // The 12:00 slot has started, so it is elapsed as well.
        assert!(!snapshot.is_slot_booked(today, time(12)));
    }

    #[test]
    fn past_dates_never_show_as_booked() {
        let now = at("2026-09-05", 9);
        let snapshot = AvailabilitySnapshot::new(pending_bookings("2026-09-02", &[8, 9, 10]), now);
        assert!(snapshot.booked_times_for_date(date("2026-09-02")).is_empty());
    }

    #[test]
    fn two_bookings_on_one_slot_occupy_it_once() {
        let now = at("2026-09-01", 7);
        let snapshot = AvailabilitySnapshot::new(
            vec![
                booking("2026-09-02", 9, QuoteStatus::Pending),
                booking("2026-09-02", 9, QuoteStatus::Confirmed),
            ],
            now,
        );
        assert_eq!(snapshot.booked_times_for_date(date("2026-09-02")).len(), 1);
    }
}
