//! Pricing route handlers.

use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};

use crate::error::Result;
use crate::AppState;

use super::calculators::calculate;
use super::config::PricingConfig;
use super::requests::EstimateRequest;
use super::responses::PriceBreakdownResponse;
use super::services;

/// Public pricing routes: the rate card the forms render and the live
/// estimate endpoint they hit on every field change.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/pricing/config", get(get_config))
        .route("/api/pricing/estimate", post(estimate))
}

/// Admin pricing routes, mounted behind the session guard.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/pricing", put(update_config))
        .route("/pricing/reset", post(reset_config))
}

async fn get_config(State(state): State<AppState>) -> Json<PricingConfig> {
    let config = services::active_pricing(&state.db, &state.cache).await;
    Json((*config).clone())
}

async fn estimate(
    State(state): State<AppState>,
    Json(request): Json<EstimateRequest>,
) -> Json<PriceBreakdownResponse> {
    let config = services::active_pricing(&state.db, &state.cache).await;
    let price = calculate(&request.into(), &config);
    Json(price.into())
}

async fn update_config(
    State(state): State<AppState>,
    Json(config): Json<PricingConfig>,
) -> Result<Json<PricingConfig>> {
    let saved = services::save_pricing(&state.db, &state.cache, config).await?;
    Ok(Json(saved))
}

async fn reset_config(State(state): State<AppState>) -> Result<Json<PricingConfig>> {
    let config = services::reset_pricing(&state.db, &state.cache).await?;
    Ok(Json(config))
}
