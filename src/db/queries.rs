//! Database queries for quotes, pricing, email, and admin sessions.
//!
//! Rows leave this module already narrowed into domain types; free-form text
//! from the store never travels further than the conversion at the bottom of
//! each query.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::AdminUser;
use crate::availability::SlotBooking;
use crate::error::{AppError, Result};
use crate::models::{
    CleaningQuote, EmailSettings, EmailTemplate, NewQuote, OutboxEntry, OutboxStatus, QuoteRow,
    QuoteStatus,
};

const QUOTE_COLUMNS: &str = r#"
    id, form_type, cleaning_type, frequency,
    kitchens, bathrooms, bedrooms, living_rooms, extras, laundry_persons,
    preferred_date, preferred_time,
    client_name, client_email, client_phone, client_address, company, details,
    subtotal, discount, total, status, created_at, updated_at
"#;

fn narrow(row: QuoteRow) -> Result<CleaningQuote> {
    CleaningQuote::try_from(row).map_err(AppError::Internal)
}

// ==================== quotes ====================

/// Insert a new quote with status `pending`.
pub async fn insert_quote(pool: &PgPool, quote: &NewQuote) -> Result<CleaningQuote> {
    let row = sqlx::query_as::<_, QuoteRow>(&format!(
        r#"
        INSERT INTO cleaning_quotes (
            id, form_type, cleaning_type, frequency,
            kitchens, bathrooms, bedrooms, living_rooms, extras, laundry_persons,
            preferred_date, preferred_time,
            client_name, client_email, client_phone, client_address, company, details,
            subtotal, discount, total, status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                $13, $14, $15, $16, $17, $18, $19, $20, $21, $22)
        RETURNING {QUOTE_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(quote.form_type.as_str())
    .bind(&quote.cleaning_type)
    .bind(&quote.frequency)
    .bind(quote.kitchens)
    .bind(&quote.bathrooms)
    .bind(&quote.bedrooms)
    .bind(quote.living_rooms)
    .bind(&quote.extras)
    .bind(quote.laundry_persons)
    .bind(quote.preferred_date)
    .bind(quote.preferred_time)
    .bind(&quote.client_name)
    .bind(&quote.client_email)
    .bind(&quote.client_phone)
    .bind(&quote.client_address)
    .bind(&quote.company)
    .bind(&quote.details)
    .bind(quote.subtotal)
    .bind(quote.discount)
    .bind(quote.total)
    .bind(QuoteStatus::Pending.as_str())
    .fetch_one(pool)
    .await?;

    narrow(row)
}

/// List quotes for the admin views, newest first, optionally by status.
pub async fn list_quotes(pool: &PgPool, status: Option<QuoteStatus>) -> Result<Vec<CleaningQuote>> {
    let rows = match status {
        Some(status) => {
            sqlx::query_as::<_, QuoteRow>(&format!(
                r#"
                SELECT {QUOTE_COLUMNS}
                FROM cleaning_quotes
                WHERE status = $1
                ORDER BY created_at DESC
                "#
            ))
            .bind(status.as_str())
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, QuoteRow>(&format!(
                r#"
                SELECT {QUOTE_COLUMNS}
                FROM cleaning_quotes
                ORDER BY created_at DESC
                "#
            ))
            .fetch_all(pool)
            .await?
        }
    };

    rows.into_iter().map(narrow).collect()
}

pub async fn get_quote(pool: &PgPool, id: Uuid) -> Result<CleaningQuote> {
    let row = sqlx::query_as::<_, QuoteRow>(&format!(
        r#"
        SELECT {QUOTE_COLUMNS}
        FROM cleaning_quotes
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    narrow(row)
}

pub async fn update_quote_status(
    pool: &PgPool,
    id: Uuid,
    status: QuoteStatus,
) -> Result<CleaningQuote> {
    let row = sqlx::query_as::<_, QuoteRow>(&format!(
        r#"
        UPDATE cleaning_quotes
        SET status = $2, updated_at = now()
        WHERE id = $1
        RETURNING {QUOTE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    narrow(row)
}

/// Replace a quote's editable fields (admin edit), keeping id and status.
pub async fn update_quote_fields(
    pool: &PgPool,
    id: Uuid,
    quote: &NewQuote,
) -> Result<CleaningQuote> {
    let row = sqlx::query_as::<_, QuoteRow>(&format!(
        r#"
        UPDATE cleaning_quotes
        SET cleaning_type = $2, frequency = $3,
            kitchens = $4, bathrooms = $5, bedrooms = $6, living_rooms = $7,
            extras = $8, laundry_persons = $9,
            preferred_date = $10, preferred_time = $11,
            client_name = $12, client_email = $13, client_phone = $14,
            client_address = $15, company = $16, details = $17,
            subtotal = $18, discount = $19, total = $20,
            updated_at = now()
        WHERE id = $1
        RETURNING {QUOTE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&quote.cleaning_type)
    .bind(&quote.frequency)
    .bind(quote.kitchens)
    .bind(&quote.bathrooms)
    .bind(&quote.bedrooms)
    .bind(quote.living_rooms)
    .bind(&quote.extras)
    .bind(quote.laundry_persons)
    .bind(quote.preferred_date)
    .bind(quote.preferred_time)
    .bind(&quote.client_name)
    .bind(&quote.client_email)
    .bind(&quote.client_phone)
    .bind(&quote.client_address)
    .bind(&quote.company)
    .bind(&quote.details)
    .bind(quote.subtotal)
    .bind(quote.discount)
    .bind(quote.total)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    narrow(row)
}

/// Hard delete, any status. No recovery.
pub async fn delete_quote(pool: &PgPool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM cleaning_quotes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// Scheduling fields of every booking that could occupy a slot on or after
/// `from`. Status filtering is repeated in the resolver; the WHERE clause
/// just keeps the result small.
pub async fn occupying_slot_bookings(pool: &PgPool, from: NaiveDate) -> Result<Vec<SlotBooking>> {
    let rows = sqlx::query_as::<_, (NaiveDate, NaiveTime, String)>(
        r#"
        SELECT preferred_date, preferred_time, status
        FROM cleaning_quotes
        WHERE preferred_date IS NOT NULL
          AND preferred_time IS NOT NULL
          AND preferred_date >= $1
          AND status NOT IN ('cancelled', 'completed')
        "#,
    )
    .bind(from)
    .fetch_all(pool)
    .await?;

    let bookings = rows
        .into_iter()
        .filter_map(|(date, time, status)| {
            QuoteStatus::parse(&status).map(|status| SlotBooking { date, time, status })
        })
        .collect();

    Ok(bookings)
}

/// Per-status counts for the admin dashboard
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct DashboardCounts {
    pub pending: i64,
    pub confirmed: i64,
    pub completed: i64,
    pub cancelled: i64,
}

pub async fn dashboard_counts(pool: &PgPool) -> Result<DashboardCounts> {
    let (pending, confirmed, completed, cancelled): (i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*) FILTER (WHERE status = 'pending'),
            COUNT(*) FILTER (WHERE status = 'confirmed'),
            COUNT(*) FILTER (WHERE status = 'completed'),
            COUNT(*) FILTER (WHERE status = 'cancelled')
        FROM cleaning_quotes
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(DashboardCounts { pending, confirmed, completed, cancelled })
}

// ==================== pricing settings ====================

/// The active rate table document, if one exists.
pub async fn get_active_pricing(pool: &PgPool) -> Result<Option<serde_json::Value>> {
    let config = sqlx::query_scalar::<_, serde_json::Value>(
        r#"
        SELECT config
        FROM pricing_settings
        WHERE is_active = true
        ORDER BY updated_at DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(config)
}

/// Replace the active rate table, inserting the record if none exists yet.
pub async fn upsert_active_pricing(pool: &PgPool, config: serde_json::Value) -> Result<()> {
    let updated = sqlx::query(
        r#"
        UPDATE pricing_settings
        SET config = $1, updated_at = now()
        WHERE is_active = true
        "#,
    )
    .bind(&config)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        sqlx::query(
            r#"
            INSERT INTO pricing_settings (id, config, is_active)
            VALUES ($1, $2, true)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&config)
        .execute(pool)
        .await?;
    }

    Ok(())
}

// ==================== email ====================

pub async fn get_email_settings(pool: &PgPool) -> Result<Option<EmailSettings>> {
    let settings = sqlx::query_as::<_, EmailSettings>(
        r#"
        SELECT admin_email, from_email, from_name,
               send_client_notifications, send_admin_notifications
        FROM email_settings
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(settings)
}

pub async fn upsert_email_settings(pool: &PgPool, settings: &EmailSettings) -> Result<()> {
    let updated = sqlx::query(
        r#"
        UPDATE email_settings
        SET admin_email = $1, from_email = $2, from_name = $3,
            send_client_notifications = $4, send_admin_notifications = $5
        "#,
    )
    .bind(&settings.admin_email)
    .bind(&settings.from_email)
    .bind(&settings.from_name)
    .bind(settings.send_client_notifications)
    .bind(settings.send_admin_notifications)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        sqlx::query(
            r#"
            INSERT INTO email_settings
                (admin_email, from_email, from_name,
                 send_client_notifications, send_admin_notifications)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&settings.admin_email)
        .bind(&settings.from_email)
        .bind(&settings.from_name)
        .bind(settings.send_client_notifications)
        .bind(settings.send_admin_notifications)
        .execute(pool)
        .await?;
    }

    Ok(())
}

pub async fn list_email_templates(pool: &PgPool) -> Result<Vec<EmailTemplate>> {
    let templates = sqlx::query_as::<_, EmailTemplate>(
        r#"
        SELECT template_type, subject, body_html, enabled
        FROM email_templates
        ORDER BY template_type
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(templates)
}

pub async fn get_email_template(
    pool: &PgPool,
    template_type: &str,
) -> Result<Option<EmailTemplate>> {
    let template = sqlx::query_as::<_, EmailTemplate>(
        r#"
        SELECT template_type, subject, body_html, enabled
        FROM email_templates
        WHERE template_type = $1
        "#,
    )
    .bind(template_type)
    .fetch_optional(pool)
    .await?;

    Ok(template)
}

pub async fn upsert_email_template(pool: &PgPool, template: &EmailTemplate) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO email_templates (template_type, subject, body_html, enabled)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (template_type)
        DO UPDATE SET subject = $2, body_html = $3, enabled = $4
        "#,
    )
    .bind(&template.template_type)
    .bind(&template.subject)
    .bind(&template.body_html)
    .bind(template.enabled)
    .execute(pool)
    .await?;

    Ok(())
}

// ==================== notification outbox ====================

pub async fn enqueue_notification(
    pool: &PgPool,
    quote_id: Uuid,
    notification_type: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO email_outbox (id, quote_id, notification_type, status, attempts)
        VALUES ($1, $2, $3, $4, 0)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(quote_id)
    .bind(notification_type)
    .bind(OutboxStatus::Pending.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

/// Outbox entries still awaiting delivery, oldest first.
pub async fn pending_outbox(
    pool: &PgPool,
    max_attempts: i32,
    limit: i64,
) -> Result<Vec<OutboxEntry>> {
    let entries = sqlx::query_as::<_, OutboxEntry>(
        r#"
        SELECT id, quote_id, notification_type, status, attempts,
               last_error, created_at, sent_at
        FROM email_outbox
        WHERE status = $1 AND attempts < $2
        ORDER BY created_at
        LIMIT $3
        "#,
    )
    .bind(OutboxStatus::Pending.as_str())
    .bind(max_attempts)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

pub async fn mark_outbox_sent(pool: &PgPool, id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE email_outbox
        SET status = $2, sent_at = now()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(OutboxStatus::Sent.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

/// Record a delivery failure. The entry stays `pending` for another attempt
/// until `max_attempts` is reached, then flips to `failed`.
pub async fn mark_outbox_failed(
    pool: &PgPool,
    id: Uuid,
    error: &str,
    max_attempts: i32,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE email_outbox
        SET attempts = attempts + 1,
            last_error = $2,
            status = CASE WHEN attempts + 1 >= $3 THEN $4 ELSE $5 END
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(error)
    .bind(max_attempts)
    .bind(OutboxStatus::Failed.as_str())
    .bind(OutboxStatus::Pending.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

// ==================== admin users & sessions ====================

pub async fn get_admin_by_email(pool: &PgPool, email: &str) -> Result<Option<AdminUser>> {
    let user = sqlx::query_as::<_, AdminUser>(
        r#"
        SELECT id, email, password_hash
        FROM admin_users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn count_admins(pool: &PgPool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin_users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn insert_admin(pool: &PgPool, email: &str, password_hash: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO admin_users (id, email, password_hash)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_session(
    pool: &PgPool,
    token: &str,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO admin_sessions (token, user_id, expires_at)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(token)
    .bind(user_id)
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// The admin behind a still-valid session token.
pub async fn session_user(pool: &PgPool, token: &str) -> Result<Option<AdminUser>> {
    let user = sqlx::query_as::<_, AdminUser>(
        r#"
        SELECT u.id, u.email, u.password_hash
        FROM admin_sessions s
        JOIN admin_users u ON u.id = s.user_id
        WHERE s.token = $1 AND s.expires_at > now()
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn delete_session(pool: &PgPool, token: &str) -> Result<()> {
    sqlx::query("DELETE FROM admin_sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn purge_expired_sessions(pool: &PgPool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM admin_sessions WHERE expires_at <= now()")
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
