//! Notification outbox: enqueue on write, deliver in the background.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tokio::time::interval;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::AppCache;
use crate::db::queries;
use crate::models::{CleaningQuote, EmailSettings, OutboxEntry};
use crate::AppState;

use super::NotificationType;

const MAX_ATTEMPTS: i32 = 5;
const DISPATCH_INTERVAL: Duration = Duration::from_secs(30);
const BATCH_SIZE: i64 = 20;

/// Queue notifications for a booking. Never fails the calling write: an
/// enqueue error is logged and dropped.
pub async fn enqueue(pool: &PgPool, quote_id: Uuid, types: &[NotificationType]) {
    for notification_type in types {
        if let Err(e) = queries::enqueue_notification(pool, quote_id, notification_type.as_str()).await
        {
            warn!(
                "Failed to enqueue {} notification for quote {}: {}",
                notification_type, quote_id, e
            );
        }
    }
}

/// Email settings with the same read-through/default discipline as pricing.
pub async fn email_settings(pool: &PgPool, cache: &AppCache) -> Arc<EmailSettings> {
    if let Some(cached) = cache.email_settings.get(AppCache::EMAIL_SETTINGS_KEY).await {
        return cached;
    }

    let settings = match queries::get_email_settings(pool).await {
        Ok(settings) => settings.unwrap_or_default(),
        Err(e) => {
            warn!("Failed to load email settings, using defaults: {}", e);
            EmailSettings::default()
        }
    };

    let settings = Arc::new(settings);
    cache
        .email_settings
        .insert(AppCache::EMAIL_SETTINGS_KEY.to_string(), settings.clone())
        .await;
    settings
}

/// Background task draining the outbox.
pub async fn run_outbox_dispatcher(state: AppState) {
    let mut interval = interval(DISPATCH_INTERVAL);
    loop {
        interval.tick().await;
        if let Err(e) = dispatch_batch(&state).await {
            warn!("Outbox dispatch pass failed: {}", e);
        }
    }
}

async fn dispatch_batch(state: &AppState) -> crate::error::Result<()> {
    let entries = queries::pending_outbox(&state.db, MAX_ATTEMPTS, BATCH_SIZE).await?;
    for entry in entries {
        deliver(state, &entry).await;
    }
    Ok(())
}

/// Deliver one outbox entry, recording the outcome. Failures stay queued
/// until the retry budget runs out.
async fn deliver(state: &AppState, entry: &OutboxEntry) {
    let outcome = try_deliver(state, entry).await;
    let result = match outcome {
        Ok(()) => queries::mark_outbox_sent(&state.db, entry.id).await,
        Err(reason) => {
            warn!(
                "Delivery of {} for quote {} failed (attempt {}): {}",
                entry.notification_type,
                entry.quote_id,
                entry.attempts + 1,
                reason
            );
            queries::mark_outbox_failed(&state.db, entry.id, &reason, MAX_ATTEMPTS).await
        }
    };
    if let Err(e) = result {
        warn!("Failed to record outbox outcome for {}: {}", entry.id, e);
    }
}

async fn try_deliver(state: &AppState, entry: &OutboxEntry) -> Result<(), String> {
    let notification_type = NotificationType::parse(&entry.notification_type)
        .ok_or_else(|| format!("unknown notification type '{}'", entry.notification_type))?;

    let quote = queries::get_quote(&state.db, entry.quote_id)
        .await
        .map_err(|e| format!("quote lookup failed: {e}"))?;

    let settings = email_settings(&state.db, &state.cache).await;
    let template = queries::get_email_template(&state.db, notification_type.as_str())
        .await
        .map_err(|e| format!("template lookup failed: {e}"))?
        .ok_or_else(|| format!("no template for '{notification_type}'"))?;

    if !template.enabled {
        info!("Template {} disabled, skipping delivery", notification_type);
        return Ok(());
    }

    let from = format!("{} <{}>", settings.from_name, settings.from_email);
    let admin_url = format!("{}/admin/submissions", state.site_url);
    let subject = render_template(&template.subject, &quote, &admin_url);
    let body = render_template(&template.body_html, &quote, &admin_url);

    if notification_type.is_client_facing() {
        if settings.send_client_notifications {
            state
                .mailer
                .send(&from, &quote.client_email, &subject, &body)
                .await
                .map_err(|e| e.to_string())?;
        }
        // Confirmed/cancelled also land in the admin inbox as a copy; the
        // created event has its own admin_new_booking entry instead.
        if settings.send_admin_notifications
            && !matches!(notification_type, NotificationType::AppointmentCreated)
        {
            state
                .mailer
                .send(
                    &from,
                    &settings.admin_email,
                    &format!("[Admin] {subject}"),
                    &body,
                )
                .await
                .map_err(|e| e.to_string())?;
        }
    } else if settings.send_admin_notifications {
        state
            .mailer
            .send(&from, &settings.admin_email, &subject, &body)
            .await
            .map_err(|e| e.to_string())?;
    }

    Ok(())
}

/// Substitute `{{variable}}` placeholders with booking fields.
pub fn render_template(template: &str, quote: &CleaningQuote, admin_url: &str) -> String {
    let preferred_date = quote
        .preferred_date
        .map(|date| date.format("%A, %B %-d, %Y").to_string())
        .unwrap_or_default();
    let preferred_time = quote
        .preferred_time
        .map(|time| time.format("%H:%M").to_string())
        .unwrap_or_else(|| "To be confirmed".to_string());

    let substitutions = [
        ("{{client_name}}", quote.client_name.clone()),
        ("{{client_email}}", quote.client_email.clone()),
        ("{{client_phone}}", quote.client_phone.clone()),
        ("{{client_address}}", quote.client_address.clone()),
        ("{{cleaning_type}}", quote.cleaning_type.clone().unwrap_or_default()),
        ("{{frequency}}", quote.frequency.clone().unwrap_or_default()),
        ("{{preferred_date}}", preferred_date),
        ("{{preferred_time}}", preferred_time),
        ("{{total}}", format!("{:.2}", quote.total)),
        ("{{admin_url}}", admin_url.to_string()),
    ];

    let mut result = template.to_string();
    for (key, value) in substitutions {
        result = result.replace(key, &value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CleaningFormType, QuoteStatus};
    use chrono::{NaiveDate, NaiveTime, Utc};
    use rust_decimal_macros::dec;

    fn sample_quote() -> CleaningQuote {
        CleaningQuote {
            id: Uuid::nil(),
            form_type: CleaningFormType::House,
            cleaning_type: Some("standard".to_string()),
            frequency: Some("weekly".to_string()),
            kitchens: Some(1),
            bathrooms: Some("1".to_string()),
            bedrooms: Some("2".to_string()),
            living_rooms: Some(1),
            extras: vec![],
            laundry_persons: Some(0),
            preferred_date: NaiveDate::from_ymd_opt(2026, 3, 2),
            preferred_time: NaiveTime::from_hms_opt(9, 0, 0),
            client_name: "Dana Leduc".to_string(),
            client_email: "dana@example.ca".to_string(),
            client_phone: "(613) 555-0147".to_string(),
            client_address: "12 Maple Lane, Ottawa".to_string(),
            company: None,
            details: None,
            subtotal: dec!(189),
            discount: dec!(37.80),
            total: dec!(151.20),
            status: QuoteStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn substitutes_all_booking_variables() {
        let rendered = render_template(
            "Hi {{client_name}}, your {{cleaning_type}} clean on {{preferred_date}} at \
             {{preferred_time}} totals ${{total}}. Manage: {{admin_url}}",
            &sample_quote(),
            "https://app.shinypathcleaning.ca/admin/submissions",
        );

        assert_eq!(
            rendered,
            "Hi Dana Leduc, your standard clean on Monday, March 2, 2026 at 09:00 totals \
             $151.20. Manage: https://app.shinypathcleaning.ca/admin/submissions"
        );
    }

    #[test]
    fn missing_time_renders_as_to_be_confirmed() {
        let mut quote = sample_quote();
        quote.preferred_time = None;
        let rendered = render_template("{{preferred_time}}", &quote, "");
        assert_eq!(rendered, "To be confirmed");
    }

    #[test]
    fn repeated_placeholders_all_substitute() {
        let rendered = render_template("{{client_name}} / {{client_name}}", &sample_quote(), "");
        assert_eq!(rendered, "Dana Leduc / Dana Leduc");
    }

    #[test]
    fn unknown_placeholders_pass_through() {
        let rendered = render_template("{{surprise}}", &sample_quote(), "");
        assert_eq!(rendered, "{{surprise}}");
    }
}
