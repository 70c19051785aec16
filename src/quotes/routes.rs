//! Quote route handlers: public intake and admin management.

use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::queries::{self, DashboardCounts};
use crate::error::{AppError, Result};
use crate::models::{CleaningFormType, CleaningQuote, QuoteStatus};
use crate::AppState;

use super::requests::{EditQuoteRequest, HouseQuoteRequest, InquiryRequest, UpdateStatusRequest};
use super::services;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/quotes/house", post(create_house))
        .route("/api/quotes/office", post(create_office))
        .route("/api/quotes/post-construction", post(create_post_construction))
        .route("/api/quotes/contact", post(create_contact))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/quotes", get(list_quotes))
        .route("/quotes/:id", get(get_quote).put(edit_quote).delete(delete_quote))
        .route("/quotes/:id/status", patch(update_status))
        .route("/dashboard", get(dashboard))
}

async fn create_house(
    State(state): State<AppState>,
    Json(request): Json<HouseQuoteRequest>,
) -> Result<Json<CleaningQuote>> {
    let quote = services::create_house_quote(&state, request).await?;
    Ok(Json(quote))
}

async fn create_office(
    State(state): State<AppState>,
    Json(request): Json<InquiryRequest>,
) -> Result<Json<CleaningQuote>> {
    let quote = services::create_inquiry(&state, CleaningFormType::Office, request).await?;
    Ok(Json(quote))
}

async fn create_post_construction(
    State(state): State<AppState>,
    Json(request): Json<InquiryRequest>,
) -> Result<Json<CleaningQuote>> {
    let quote =
        services::create_inquiry(&state, CleaningFormType::PostConstruction, request).await?;
    Ok(Json(quote))
}

async fn create_contact(
    State(state): State<AppState>,
    Json(request): Json<InquiryRequest>,
) -> Result<Json<CleaningQuote>> {
    let quote = services::create_inquiry(&state, CleaningFormType::Contact, request).await?;
    Ok(Json(quote))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    status: Option<String>,
}

async fn list_quotes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CleaningQuote>>> {
    let status = match query.status.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(QuoteStatus::parse(raw).ok_or_else(|| {
            AppError::Validation(vec![format!("unknown status filter '{raw}'")])
        })?),
    };

    let quotes = queries::list_quotes(&state.db, status).await?;
    Ok(Json(quotes))
}

async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CleaningQuote>> {
    let quote = queries::get_quote(&state.db, id).await?;
    Ok(Json(quote))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<CleaningQuote>> {
    let next = QuoteStatus::parse(&request.status).ok_or_else(|| {
        AppError::Validation(vec![format!("unknown status '{}'", request.status)])
    })?;
    let quote = services::change_status(&state, id, next).await?;
    Ok(Json(quote))
}

async fn edit_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<EditQuoteRequest>,
) -> Result<Json<CleaningQuote>> {
    let quote = services::edit_quote(&state, id, request).await?;
    Ok(Json(quote))
}

async fn delete_quote(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<serde_json::Value>> {
    queries::delete_quote(&state.db, id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardCounts>> {
    let counts = queries::dashboard_counts(&state.db).await?;
    Ok(Json(counts))
}
