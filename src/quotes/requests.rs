//! Request DTOs for the public quote forms and admin edits.
//!
//! Every field is defaulted at the serde layer so validation can look at the
//! whole submission and report all violations in one response instead of
//! failing on the first missing field.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

/// Full house-cleaning quote form
#[derive(Debug, Deserialize, Validate)]
pub struct HouseQuoteRequest {
    #[validate(length(min = 1, message = "Cleaning type is required"))]
    #[serde(default)]
    pub cleaning_type: String,
    #[validate(length(min = 1, message = "Frequency is required"))]
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub kitchens: u32,
    #[serde(default = "zero_count")]
    pub bathrooms: String,
    #[serde(default = "zero_count")]
    pub bedrooms: String,
    #[serde(default)]
    pub living_rooms: u32,
    #[serde(default)]
    pub extras: Vec<String>,
    #[serde(default)]
    pub laundry_persons: u32,
    #[validate(required(message = "Date is required"))]
    #[serde(default)]
    pub preferred_date: Option<NaiveDate>,
    #[validate(required(message = "Time is required"))]
    #[serde(default)]
    pub preferred_time: Option<NaiveTime>,
    #[validate(length(min = 1, message = "Full name is required"))]
    #[serde(default)]
    pub client_name: String,
    #[validate(email(message = "A valid email is required"))]
    #[serde(default)]
    pub client_email: String,
    #[validate(custom(function = "validate_phone"))]
    #[serde(default)]
    pub client_phone: String,
    #[validate(length(min = 1, message = "Service address is required"))]
    #[serde(default)]
    pub client_address: String,
    #[serde(default)]
    pub details: Option<String>,
}

/// Contact-style forms: office, post-construction, and general contact.
/// No room pricing; the booking is a request for a custom quote.
#[derive(Debug, Deserialize, Validate)]
pub struct InquiryRequest {
    #[validate(length(min = 1, message = "Full name is required"))]
    #[serde(default)]
    pub client_name: String,
    #[validate(email(message = "A valid email is required"))]
    #[serde(default)]
    pub client_email: String,
    #[validate(custom(function = "validate_phone"))]
    #[serde(default)]
    pub client_phone: String,
    #[serde(default)]
    pub client_address: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub preferred_date: Option<NaiveDate>,
    #[serde(default)]
    pub preferred_time: Option<NaiveTime>,
    #[serde(default)]
    pub details: Option<String>,
}

/// Admin edit of an existing booking. Service fields are optional; contact
/// fields are always present.
#[derive(Debug, Deserialize, Validate)]
pub struct EditQuoteRequest {
    #[serde(default)]
    pub cleaning_type: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub kitchens: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<String>,
    #[serde(default)]
    pub bedrooms: Option<String>,
    #[serde(default)]
    pub living_rooms: Option<u32>,
    #[serde(default)]
    pub extras: Option<Vec<String>>,
    #[serde(default)]
    pub laundry_persons: Option<u32>,
    #[serde(default)]
    pub preferred_date: Option<NaiveDate>,
    #[serde(default)]
    pub preferred_time: Option<NaiveTime>,
    #[validate(length(min = 1, message = "Full name is required"))]
    #[serde(default)]
    pub client_name: String,
    #[validate(email(message = "A valid email is required"))]
    #[serde(default)]
    pub client_email: String,
    #[validate(custom(function = "validate_phone"))]
    #[serde(default)]
    pub client_phone: String,
    #[serde(default)]
    pub client_address: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

/// Status change request body
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

fn zero_count() -> String {
    "0".to_string()
}

/// A North American phone number has exactly 10 digits, formatted or not.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if digits == 10 {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone");
        err.message = Some("A valid 10-digit phone number is required".into());
        Err(err)
    }
}

/// Flatten validator output into one message per violation.
pub fn collect_violations(errors: ValidationErrors) -> Vec<String> {
    let mut violations: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    violations.sort();
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_accepts_formatted_and_raw_ten_digits() {
        assert!(validate_phone("(613) 555-0147").is_ok());
        assert!(validate_phone("6135550147").is_ok());
    }

    #[test]
    fn phone_rejects_wrong_digit_counts() {
        assert!(validate_phone("555-0147").is_err());
        assert!(validate_phone("+1 613 555 0147 9").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn empty_house_form_reports_every_violation_at_once() {
        let request: HouseQuoteRequest = serde_json::from_str("{}").unwrap();
        let violations = collect_violations(request.validate().unwrap_err());

        for expected in [
            "Cleaning type is required",
            "Frequency is required",
            "Date is required",
            "Time is required",
            "Full name is required",
            "A valid email is required",
            "A valid 10-digit phone number is required",
            "Service address is required",
        ] {
            assert!(
                violations.iter().any(|v| v == expected),
                "missing violation: {expected}; got {violations:?}"
            );
        }
    }

    #[test]
    fn complete_house_form_validates() {
        let request: HouseQuoteRequest = serde_json::from_value(serde_json::json!({
            "cleaning_type": "standard",
            "frequency": "weekly",
            "kitchens": 1,
            "bathrooms": "1",
            "bedrooms": "2",
            "living_rooms": 1,
            "preferred_date": "2026-09-02",
            "preferred_time": "09:00:00",
            "client_name": "Dana Leduc",
            "client_email": "dana@example.ca",
            "client_phone": "(613) 555-0147",
            "client_address": "12 Maple Lane, Ottawa",
        }))
        .unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn inquiry_requires_only_contact_fields() {
        let request: InquiryRequest = serde_json::from_value(serde_json::json!({
            "client_name": "Omar Singh",
            "client_email": "omar@example.ca",
            "client_phone": "4165550199",
        }))
        .unwrap();
        assert!(request.validate().is_ok());
    }
}
