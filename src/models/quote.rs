//! Booking records and their status lifecycle.
//!
//! Rows come out of Postgres with free-form text in `status` and `form_type`;
//! they are narrowed into closed enums here, at the store boundary, before
//! anything downstream consumes them.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle state of a booking.
///
/// ```text
/// pending -> confirmed -> completed
/// pending <-> cancelled            (reactivation allowed)
/// confirmed -> cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::Confirmed => "confirmed",
            QuoteStatus::Completed => "completed",
            QuoteStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(QuoteStatus::Pending),
            "confirmed" => Some(QuoteStatus::Confirmed),
            "completed" => Some(QuoteStatus::Completed),
            "cancelled" => Some(QuoteStatus::Cancelled),
            _ => None,
        }
    }

    /// Whether an admin may move a booking from `self` to `next`.
    ///
    /// `completed` is a dead end; `cancelled` can only be reactivated back to
    /// `pending`. Deletion is allowed from any state and is not modeled here.
    pub fn can_transition_to(&self, next: QuoteStatus) -> bool {
        use QuoteStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled) | (Cancelled, Pending)
        )
    }

    /// Statuses that occupy a calendar slot.
    pub fn occupies_slot(&self) -> bool {
        !matches!(self, QuoteStatus::Cancelled | QuoteStatus::Completed)
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which public form produced a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CleaningFormType {
    House,
    Office,
    PostConstruction,
    Contact,
}

impl CleaningFormType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CleaningFormType::House => "house",
            CleaningFormType::Office => "office",
            CleaningFormType::PostConstruction => "post-construction",
            CleaningFormType::Contact => "contact",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "house" => Some(CleaningFormType::House),
            "office" => Some(CleaningFormType::Office),
            "post-construction" => Some(CleaningFormType::PostConstruction),
            "contact" => Some(CleaningFormType::Contact),
            _ => None,
        }
    }
}

/// Raw quote row from cleaning_quotes
#[derive(Debug, Clone, FromRow)]
pub struct QuoteRow {
    pub id: Uuid,
    pub form_type: String,
    pub cleaning_type: Option<String>,
    pub frequency: Option<String>,
    pub kitchens: Option<i32>,
    pub bathrooms: Option<String>,
    pub bedrooms: Option<String>,
    pub living_rooms: Option<i32>,
    pub extras: Option<Vec<String>>,
    pub laundry_persons: Option<i32>,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time: Option<NaiveTime>,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub client_address: String,
    pub company: Option<String>,
    pub details: Option<String>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A booking, narrowed from its row form
#[derive(Debug, Clone, Serialize)]
pub struct CleaningQuote {
    pub id: Uuid,
    pub form_type: CleaningFormType,
    pub cleaning_type: Option<String>,
    pub frequency: Option<String>,
    pub kitchens: Option<i32>,
    pub bathrooms: Option<String>,
    pub bedrooms: Option<String>,
    pub living_rooms: Option<i32>,
    pub extras: Vec<String>,
    pub laundry_persons: Option<i32>,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time: Option<NaiveTime>,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub client_address: String,
    pub company: Option<String>,
    pub details: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<QuoteRow> for CleaningQuote {
    type Error = String;

    fn try_from(row: QuoteRow) -> Result<Self, Self::Error> {
        let form_type = CleaningFormType::parse(&row.form_type)
            .ok_or_else(|| format!("unknown form_type '{}' on quote {}", row.form_type, row.id))?;
        let status = QuoteStatus::parse(&row.status)
            .ok_or_else(|| format!("unknown status '{}' on quote {}", row.status, row.id))?;

        Ok(CleaningQuote {
            id: row.id,
            form_type,
            cleaning_type: row.cleaning_type,
            frequency: row.frequency,
            kitchens: row.kitchens,
            bathrooms: row.bathrooms,
            bedrooms: row.bedrooms,
            living_rooms: row.living_rooms,
            extras: row.extras.unwrap_or_default(),
            laundry_persons: row.laundry_persons,
            preferred_date: row.preferred_date,
            preferred_time: row.preferred_time,
            client_name: row.client_name,
            client_email: row.client_email,
            client_phone: row.client_phone,
            client_address: row.client_address,
            company: row.company,
            details: row.details,
            subtotal: row.subtotal,
            discount: row.discount,
            total: row.total,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insert payload for a new quote, status always starts at `pending`
#[derive(Debug, Clone)]
pub struct NewQuote {
    pub form_type: CleaningFormType,
    pub cleaning_type: Option<String>,
    pub frequency: Option<String>,
    pub kitchens: Option<i32>,
    pub bathrooms: Option<String>,
    pub bedrooms: Option<String>,
    pub living_rooms: Option<i32>,
    pub extras: Vec<String>,
    pub laundry_persons: Option<i32>,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time: Option<NaiveTime>,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub client_address: String,
    pub company: Option<String>,
    pub details: Option<String>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_machine_allows_documented_transitions() {
        use QuoteStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(Cancelled.can_transition_to(Pending));
    }

    #[test]
    fn status_machine_rejects_everything_else() {
        use QuoteStatus::*;
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Confirmed));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Cancelled.can_transition_to(Completed));
    }

    #[test]
    fn cancelled_and_completed_free_their_slot() {
        assert!(QuoteStatus::Pending.occupies_slot());
        assert!(QuoteStatus::Confirmed.occupies_slot());
        assert!(!QuoteStatus::Cancelled.occupies_slot());
        assert!(!QuoteStatus::Completed.occupies_slot());
    }

    #[test]
    fn status_roundtrips_through_text() {
        for s in [
            QuoteStatus::Pending,
            QuoteStatus::Confirmed,
            QuoteStatus::Completed,
            QuoteStatus::Cancelled,
        ] {
            assert_eq!(QuoteStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(QuoteStatus::parse("accepted"), None);
    }

    #[test]
    fn form_type_parses_kebab_case() {
        assert_eq!(
            CleaningFormType::parse("post-construction"),
            Some(CleaningFormType::PostConstruction)
        );
        assert_eq!(CleaningFormType::parse("warehouse"), None);
    }
}
