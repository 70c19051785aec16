//! Quote intake and admin actions.
//!
//! Price breakdowns are always recomputed server-side from the active rate
//! table; whatever the client showed the user is display-only. Writes
//! enqueue notifications through the outbox and never wait on delivery.

use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::db::queries;
use crate::error::{AppError, Result};
use crate::models::{CleaningFormType, CleaningQuote, NewQuote, QuoteStatus};
use crate::notify::{outbox, NotificationType};
use crate::pricing::{calculate, services as pricing, CalculatedPrice, ServiceRequest};
use crate::quotes::requests::{
    collect_violations, EditQuoteRequest, HouseQuoteRequest, InquiryRequest,
};
use crate::AppState;

/// Create a house-cleaning booking with a server-computed price snapshot.
pub async fn create_house_quote(
    state: &AppState,
    request: HouseQuoteRequest,
) -> Result<CleaningQuote> {
    request
        .validate()
        .map_err(|errors| AppError::Validation(collect_violations(errors)))?;

    let config = pricing::active_pricing(&state.db, &state.cache).await;
    let service_request = ServiceRequest {
        cleaning_type: request.cleaning_type.clone(),
        frequency: request.frequency.clone(),
        kitchens: request.kitchens,
        bathrooms: request.bathrooms.clone(),
        bedrooms: request.bedrooms.clone(),
        living_rooms: request.living_rooms,
        extras: request.extras.clone(),
        laundry_persons: request.laundry_persons,
    };
    let price = calculate(&service_request, &config);

    let quote = queries::insert_quote(
        &state.db,
        &NewQuote {
            form_type: CleaningFormType::House,
            cleaning_type: Some(request.cleaning_type),
            frequency: Some(request.frequency),
            kitchens: Some(request.kitchens as i32),
            bathrooms: Some(request.bathrooms),
            bedrooms: Some(request.bedrooms),
            living_rooms: Some(request.living_rooms as i32),
            extras: request.extras,
            laundry_persons: Some(request.laundry_persons as i32),
            preferred_date: request.preferred_date,
            preferred_time: request.preferred_time,
            client_name: request.client_name,
            client_email: request.client_email,
            client_phone: request.client_phone,
            client_address: request.client_address,
            company: None,
            details: request.details,
            subtotal: price.subtotal,
            discount: price.discount_amount,
            total: price.total,
        },
    )
    .await?;

    outbox::enqueue(
        &state.db,
        quote.id,
        &[NotificationType::AppointmentCreated, NotificationType::AdminNewBooking],
    )
    .await;

    Ok(quote)
}

/// Create an office / post-construction / contact inquiry. No room pricing;
/// the totals stay at zero until the business quotes it by hand.
pub async fn create_inquiry(
    state: &AppState,
    form_type: CleaningFormType,
    request: InquiryRequest,
) -> Result<CleaningQuote> {
    request
        .validate()
        .map_err(|errors| AppError::Validation(collect_violations(errors)))?;

    let quote = queries::insert_quote(
        &state.db,
        &NewQuote {
            form_type,
            cleaning_type: None,
            frequency: None,
            kitchens: None,
            bathrooms: None,
            bedrooms: None,
            living_rooms: None,
            extras: Vec::new(),
            laundry_persons: None,
            preferred_date: request.preferred_date,
            preferred_time: request.preferred_time,
            client_name: request.client_name,
            client_email: request.client_email,
            client_phone: request.client_phone,
            client_address: request.client_address,
            company: request.company,
            details: request.details,
            subtotal: Decimal::ZERO,
            discount: Decimal::ZERO,
            total: Decimal::ZERO,
        },
    )
    .await?;

    outbox::enqueue(
        &state.db,
        quote.id,
        &[NotificationType::AppointmentCreated, NotificationType::AdminNewBooking],
    )
    .await;

    Ok(quote)
}

/// Move a booking through its status machine.
pub async fn change_status(state: &AppState, id: Uuid, next: QuoteStatus) -> Result<CleaningQuote> {
    let current = queries::get_quote(&state.db, id).await?;
    if !current.status.can_transition_to(next) {
        return Err(AppError::Conflict(format!(
            "cannot move booking from {} to {}",
            current.status, next
        )));
    }

    let updated = queries::update_quote_status(&state.db, id, next).await?;

    match next {
        QuoteStatus::Confirmed => {
            outbox::enqueue(&state.db, id, &[NotificationType::AppointmentConfirmed]).await
        }
        QuoteStatus::Cancelled => {
            outbox::enqueue(&state.db, id, &[NotificationType::AppointmentCancelled]).await
        }
        QuoteStatus::Pending | QuoteStatus::Completed => {}
    }

    Ok(updated)
}

/// Admin edit. House bookings get their breakdown recomputed from the
/// current rate table; inquiry totals are left untouched.
pub async fn edit_quote(
    state: &AppState,
    id: Uuid,
    request: EditQuoteRequest,
) -> Result<CleaningQuote> {
    request
        .validate()
        .map_err(|errors| AppError::Validation(collect_violations(errors)))?;

    let existing = queries::get_quote(&state.db, id).await?;

    let cleaning_type = request.cleaning_type.or(existing.cleaning_type);
    let frequency = request.frequency.or(existing.frequency);
    let kitchens = request
        .kitchens
        .map(|n| n as i32)
        .or(existing.kitchens);
    let bathrooms = request.bathrooms.or(existing.bathrooms);
    let bedrooms = request.bedrooms.or(existing.bedrooms);
    let living_rooms = request
        .living_rooms
        .map(|n| n as i32)
        .or(existing.living_rooms);
    let extras = request.extras.unwrap_or(existing.extras);
    let laundry_persons = request
        .laundry_persons
        .map(|n| n as i32)
        .or(existing.laundry_persons);

    let (subtotal, discount, total) = if existing.form_type == CleaningFormType::House {
        let config = pricing::active_pricing(&state.db, &state.cache).await;
        let price: CalculatedPrice = calculate(
            &ServiceRequest {
                cleaning_type: cleaning_type.clone().unwrap_or_default(),
                frequency: frequency.clone().unwrap_or_default(),
                kitchens: kitchens.unwrap_or(0).max(0) as u32,
                bathrooms: bathrooms.clone().unwrap_or_else(|| "0".to_string()),
                bedrooms: bedrooms.clone().unwrap_or_else(|| "0".to_string()),
                living_rooms: living_rooms.unwrap_or(0).max(0) as u32,
                extras: extras.clone(),
                laundry_persons: laundry_persons.unwrap_or(0).max(0) as u32,
            },
            &config,
        );
        (price.subtotal, price.discount_amount, price.total)
    } else {
        (existing.subtotal, existing.discount, existing.total)
    };

    queries::update_quote_fields(
        &state.db,
        id,
        &NewQuote {
            form_type: existing.form_type,
            cleaning_type,
            frequency,
            kitchens,
            bathrooms,
            bedrooms,
            living_rooms,
            extras,
            laundry_persons,
            preferred_date: request.preferred_date.or(existing.preferred_date),
            preferred_time: request.preferred_time.or(existing.preferred_time),
            client_name: request.client_name,
            client_email: request.client_email,
            client_phone: request.client_phone,
            client_address: request.client_address,
            company: request.company.or(existing.company),
            details: request.details.or(existing.details),
            subtotal,
            discount,
            total,
        },
    )
    .await
}
