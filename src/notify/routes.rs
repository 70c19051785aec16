//! Admin routes for email settings and templates.

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};

use crate::db::queries;
use crate::error::{AppError, Result};
use crate::models::{EmailSettings, EmailTemplate};
use crate::AppState;

use super::{outbox, NotificationType};

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/email-settings", get(get_settings).put(update_settings))
        .route("/email-templates", get(list_templates))
        .route("/email-templates/:template_type", put(update_template))
}

async fn get_settings(State(state): State<AppState>) -> Json<EmailSettings> {
    let settings = outbox::email_settings(&state.db, &state.cache).await;
    Json((*settings).clone())
}

async fn update_settings(
    State(state): State<AppState>,
    Json(settings): Json<EmailSettings>,
) -> Result<Json<EmailSettings>> {
    queries::upsert_email_settings(&state.db, &settings).await?;
    state.cache.invalidate_email_settings().await;
    Ok(Json(settings))
}

async fn list_templates(State(state): State<AppState>) -> Result<Json<Vec<EmailTemplate>>> {
    let templates = queries::list_email_templates(&state.db).await?;
    Ok(Json(templates))
}

async fn update_template(
    State(state): State<AppState>,
    Path(template_type): Path<String>,
    Json(mut template): Json<EmailTemplate>,
) -> Result<Json<EmailTemplate>> {
    if NotificationType::parse(&template_type).is_none() {
        return Err(AppError::Validation(vec![format!(
            "unknown template type '{template_type}'"
        )]));
    }

    template.template_type = template_type;
    queries::upsert_email_template(&state.db, &template).await?;
    Ok(Json(template))
}
