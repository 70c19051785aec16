//! Shiny Path Cleaning backend.
//!
//! JSON API behind the public quote forms and the admin panel: pricing
//! estimates from a configurable rate table, per-date slot availability,
//! booking lifecycle management, and outbox-based email notifications.

pub mod auth;
pub mod availability;
pub mod cache;
pub mod db;
pub mod error;
pub mod models;
pub mod notify;
pub mod pricing;
pub mod quotes;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use sqlx::PgPool;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use cache::AppCache;
use notify::Mailer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
    pub mailer: Arc<dyn Mailer>,
    /// Public origin of the site, used for CORS and admin links in emails.
    pub site_url: String,
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let admin = Router::new()
        .merge(quotes::admin_router())
        .merge(pricing::routes::admin_router())
        .merge(notify::routes::admin_router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    let cors = match state.site_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
        Err(_) => CorsLayer::permissive(),
    };

    Router::new()
        .route("/health", get(health))
        .merge(pricing::router())
        .merge(availability::router())
        .merge(quotes::router())
        .merge(auth::router())
        .nest("/api/admin", admin)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(CompressionLayer::new())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
