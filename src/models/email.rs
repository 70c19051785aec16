//! Email settings, templates, and the notification outbox.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Email settings singleton
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct EmailSettings {
    pub admin_email: String,
    pub from_email: String,
    pub from_name: String,
    pub send_client_notifications: bool,
    pub send_admin_notifications: bool,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            admin_email: "bookings@shinypathcleaning.ca".to_string(),
            from_email: "no-reply@shinypathcleaning.ca".to_string(),
            from_name: "Shiny Path Cleaning".to_string(),
            send_client_notifications: true,
            send_admin_notifications: true,
        }
    }
}

/// Email template keyed by notification type
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct EmailTemplate {
    #[serde(default)]
    pub template_type: String,
    pub subject: String,
    pub body_html: String,
    pub enabled: bool,
}

/// Delivery state of an outbox entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutboxStatus {
    Pending,
    Sent,
    Failed,
}

impl OutboxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutboxStatus::Pending => "pending",
            OutboxStatus::Sent => "sent",
            OutboxStatus::Failed => "failed",
        }
    }
}

/// A queued notification. Booking writes enqueue these and return; a
/// background dispatcher owns delivery and retries.
#[derive(Debug, Clone, FromRow)]
pub struct OutboxEntry {
    pub id: Uuid,
    pub quote_id: Uuid,
    pub notification_type: String,
    pub status: String,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
}
