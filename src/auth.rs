//! Admin authentication: argon2 credentials and cookie sessions.
//!
//! Sessions are opaque tokens stored in `admin_sessions` and carried in an
//! http-only cookie. Unauthenticated requests to admin routes get a 401 with
//! the login path so the frontend can redirect.

use std::env;

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Request, State},
    http::header::{HeaderMap, HeaderValue, COOKIE, SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{Duration, Utc};
use rand::rngs::OsRng;
use serde::Deserialize;
use serde_json::json;
use sqlx::FromRow;
use tracing::warn;
use uuid::Uuid;

use crate::db::queries;
use crate::error::{AppError, Result};
use crate::AppState;

const SESSION_COOKIE: &str = "sp_session";
const SESSION_DAYS: i64 = 7;

/// Admin account row
#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}

/// The authenticated admin, inserted as a request extension by the guard.
#[derive(Debug, Clone)]
pub struct AuthAdmin {
    pub id: Uuid,
    pub email: String,
}

pub fn hash_password(password: &str) -> std::result::Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

/// Create the initial admin account from env if none exists.
pub async fn seed_admin(pool: &sqlx::PgPool) -> Result<()> {
    if queries::count_admins(pool).await? > 0 {
        return Ok(());
    }

    let email = env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@shinypathcleaning.ca".to_string());
    let password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());
    if password == "admin" {
        warn!("ADMIN_PASSWORD not set. Using default password 'admin'. Set ADMIN_PASSWORD in production.");
    }

    let password_hash = hash_password(&password)
        .map_err(|e| AppError::Internal(format!("password hash failed: {e}")))?;
    queries::insert_admin(pool, &email, &password_hash).await?;
    Ok(())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/login", post(login))
        .route("/api/admin/logout", post(logout))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginRequest>,
) -> Result<Response> {
    let user = queries::get_admin_by_email(&state.db, &form.email)
        .await?
        .filter(|user| verify_password(&form.password, &user.password_hash))
        .ok_or(AppError::Unauthorized)?;

    queries::purge_expired_sessions(&state.db).await?;

    let token = Uuid::new_v4().simple().to_string();
    let expires_at = Utc::now() + Duration::days(SESSION_DAYS);
    queries::create_session(&state.db, &token, user.id, expires_at).await?;

    let cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_DAYS * 24 * 60 * 60
    );
    let mut response = Json(json!({ "ok": true, "email": user.email })).into_response();
    response.headers_mut().insert(
        SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| AppError::Internal(e.to_string()))?,
    );
    Ok(response)
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    if let Some(token) = session_token(&headers) {
        queries::delete_session(&state.db, &token).await?;
    }

    let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    let mut response = Json(json!({ "ok": true })).into_response();
    response.headers_mut().insert(
        SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| AppError::Internal(e.to_string()))?,
    );
    Ok(response)
}

/// Session guard for `/api/admin` routes.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = session_token(request.headers()).ok_or(AppError::Unauthorized)?;
    let user = queries::session_user(&state.db, &token)
        .await?
        .ok_or(AppError::Unauthorized)?;

    request
        .extensions_mut()
        .insert(AuthAdmin { id: user.id, email: user.email });
    Ok(next.run(request).await)
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("squeaky-clean").unwrap();
        assert!(verify_password("squeaky-clean", &hash));
        assert!(!verify_password("grimy", &hash));
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn session_token_parses_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; sp_session=abc123; lang=en"),
        );
        assert_eq!(session_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn session_token_absent_when_cookie_missing() {
        let headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);
    }
}
