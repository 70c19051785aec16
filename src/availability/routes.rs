//! Availability route handlers.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::AppState;

use super::resolver::{daily_slots, DateAvailability, TOTAL_DAILY_SLOTS};
use super::services;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/availability/:date", get(date_availability))
}

#[derive(Debug, Serialize)]
struct SlotResponse {
    time: NaiveTime,
    booked: bool,
}

#[derive(Debug, Serialize)]
struct DateAvailabilityResponse {
    date: NaiveDate,
    availability: DateAvailability,
    fully_booked: bool,
    total_slots: usize,
    available_slots: usize,
    booked_times: Vec<NaiveTime>,
    slots: Vec<SlotResponse>,
}

/// Per-date slot picture for the booking form's date/time picker.
async fn date_availability(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DateAvailabilityResponse>> {
    let date: NaiveDate = date
        .parse()
        .map_err(|_| AppError::Validation(vec!["date must be formatted YYYY-MM-DD".to_string()]))?;

    let snapshot = services::current_snapshot(&state.db).await;
    let booked = snapshot.booked_times_for_date(date);

    let slots = daily_slots()
        .into_iter()
        .map(|time| SlotResponse { time, booked: booked.contains(&time) })
        .collect();

    Ok(Json(DateAvailabilityResponse {
        date,
        availability: snapshot.date_availability(date),
        fully_booked: snapshot.is_date_fully_booked(date),
        total_slots: TOTAL_DAILY_SLOTS,
        available_slots: snapshot.available_slots_count(date),
        booked_times: booked.into_iter().collect(),
        slots,
    }))
}
