//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no database access. The breakdown is
//! recomputed on every estimate request, so everything here must stay cheap
//! and side-effect-free.

use std::collections::BTreeSet;

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::pricing::config::{PricingConfig, FALLBACK_TYPE_PRICE};

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use shinypath_web::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// What the client is asking to have cleaned. Ephemeral calculator input,
/// never persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequest {
    pub cleaning_type: String,
    pub frequency: String,
    pub kitchens: u32,
    pub bathrooms: String,
    pub bedrooms: String,
    pub living_rooms: u32,
    pub extras: Vec<String>,
    pub laundry_persons: u32,
}

/// Fully itemized price breakdown.
///
/// Callers need the per-category components, not just the total: the form
/// shows the itemization live, and the persisted booking snapshots
/// subtotal/discount/total at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatedPrice {
    pub type_price: Decimal,
    pub kitchen_price: Decimal,
    pub bathroom_price: Decimal,
    pub bedroom_price: Decimal,
    pub living_room_price: Decimal,
    pub extras_price: Decimal,
    pub laundry_price: Decimal,
    pub subtotal: Decimal,
    pub discount_percent: Decimal,
    pub discount_amount: Decimal,
    pub total: Decimal,
}

/// Compute the itemized breakdown for a request against a rate table.
///
/// Total function: every lookup has a defined fallback so the rate table may
/// lag behind the form options without breaking the quote flow. An unknown
/// cleaning type prices at [`FALLBACK_TYPE_PRICE`]; unknown room counts,
/// extras, and frequencies contribute zero. Room-count lookups are exact key
/// matches with no interpolation.
pub fn calculate(request: &ServiceRequest, config: &PricingConfig) -> CalculatedPrice {
    let type_price = config
        .cleaning_types
        .get(&request.cleaning_type)
        .map(|entry| entry.price)
        .unwrap_or(FALLBACK_TYPE_PRICE);

    let kitchen_price = config
        .kitchens
        .get(&request.kitchens)
        .copied()
        .unwrap_or(Decimal::ZERO);
    let bathroom_price = config
        .bathrooms
        .get(&request.bathrooms)
        .copied()
        .unwrap_or(Decimal::ZERO);
    let bedroom_price = config
        .bedrooms
        .get(&request.bedrooms)
        .copied()
        .unwrap_or(Decimal::ZERO);
    let living_room_price = config
        .living_rooms
        .get(&request.living_rooms)
        .copied()
        .unwrap_or(Decimal::ZERO);

    // Selection is a set: a key listed twice still prices once.
    let selected: BTreeSet<&str> = request.extras.iter().map(String::as_str).collect();
    let extras_price: Decimal = selected
        .iter()
        .filter_map(|key| config.extras.get(*key))
        .map(|entry| entry.price)
        .sum();

    let laundry_price = Decimal::from(request.laundry_persons) * config.laundry_per_person;

    let subtotal = type_price
        + kitchen_price
        + bathroom_price
        + bedroom_price
        + living_room_price
        + extras_price
        + laundry_price;

    let discount_percent = config
        .frequencies
        .get(&request.frequency)
        .map(|entry| entry.discount)
        .unwrap_or(Decimal::ZERO);

    let discount_amount = round_money(subtotal * discount_percent, 2);
    let total = subtotal - discount_amount;

    CalculatedPrice {
        type_price,
        kitchen_price,
        bathroom_price,
        bedroom_price,
        living_room_price,
        extras_price,
        laundry_price,
        subtotal,
        discount_percent,
        discount_amount,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::config::default_pricing;
    use rust_decimal_macros::dec;

    fn house_request() -> ServiceRequest {
        ServiceRequest {
            cleaning_type: "standard".to_string(),
            frequency: "weekly".to_string(),
            kitchens: 1,
            bathrooms: "1".to_string(),
            bedrooms: "1".to_string(),
            living_rooms: 1,
            extras: vec![],
            laundry_persons: 0,
        }
    }

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_bankers_rounding_to_even() {
        assert_eq!(round_money(dec!(2.5), 0), dec!(2));
        assert_eq!(round_money(dec!(3.5), 0), dec!(4));
        assert_eq!(round_money(dec!(4.5), 0), dec!(4));
        assert_eq!(round_money(dec!(5.5), 0), dec!(6));
    }

    #[test]
    fn test_round_money_normal_rounding() {
        assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
        assert_eq!(round_money(dec!(1.236), 2), dec!(1.24));
    }

    // ==================== calculate tests ====================

    #[test]
    fn test_standard_weekly_house_scenario() {
        // standard 110 + kitchen 45 + bathroom 24 + bedroom 10 + living room 0
        let price = calculate(&house_request(), &default_pricing());

        assert_eq!(price.type_price, dec!(110));
        assert_eq!(price.kitchen_price, dec!(45));
        assert_eq!(price.bathroom_price, dec!(24));
        assert_eq!(price.bedroom_price, dec!(10));
        assert_eq!(price.living_room_price, dec!(0));
        assert_eq!(price.subtotal, dec!(189));
        assert_eq!(price.discount_percent, dec!(0.20));
        assert_eq!(price.discount_amount, dec!(37.80));
        assert_eq!(price.total, dec!(151.20));
    }

    #[test]
    fn test_one_time_has_no_discount() {
        let mut request = house_request();
        request.frequency = "one-time".to_string();
        let price = calculate(&request, &default_pricing());

        assert_eq!(price.subtotal, dec!(189));
        assert_eq!(price.discount_amount, dec!(0));
        assert_eq!(price.total, dec!(189));
    }

    #[test]
    fn test_extras_add_flat_prices() {
        let mut request = house_request();
        request.frequency = "one-time".to_string();
        request.extras = vec!["pets".to_string(), "dishes".to_string()];
        let price = calculate(&request, &default_pricing());

        // pets 20 + dishes 40
        assert_eq!(price.extras_price, dec!(60));
        assert_eq!(price.subtotal, dec!(249));
        assert_eq!(price.total, dec!(249));
    }

    #[test]
    fn test_duplicate_extra_counts_once() {
        let mut request = house_request();
        request.extras = vec!["pets".to_string(), "pets".to_string()];
        let price = calculate(&request, &default_pricing());
        assert_eq!(price.extras_price, dec!(20));
    }

    #[test]
    fn test_unknown_cleaning_type_falls_back_to_base() {
        let mut request = house_request();
        request.cleaning_type = "industrial".to_string();
        let price = calculate(&request, &default_pricing());
        assert_eq!(price.type_price, dec!(110));
    }

    #[test]
    fn test_unknown_extra_contributes_zero() {
        let mut request = house_request();
        request.frequency = "one-time".to_string();
        request.extras = vec!["windows".to_string(), "pets".to_string()];
        let price = calculate(&request, &default_pricing());
        assert_eq!(price.extras_price, dec!(20));
    }

    #[test]
    fn test_unknown_frequency_means_no_discount() {
        let mut request = house_request();
        request.frequency = "daily".to_string();
        let price = calculate(&request, &default_pricing());
        assert_eq!(price.discount_percent, dec!(0));
        assert_eq!(price.total, price.subtotal);
    }

    #[test]
    fn test_unknown_room_count_contributes_zero() {
        let mut request = house_request();
        request.bathrooms = "9.5".to_string();
        request.kitchens = 12;
        let price = calculate(&request, &default_pricing());
        assert_eq!(price.bathroom_price, dec!(0));
        assert_eq!(price.kitchen_price, dec!(0));
    }

    #[test]
    fn test_half_unit_bathrooms_price_by_exact_key() {
        let mut request = house_request();
        request.bathrooms = "1.5".to_string();
        let price = calculate(&request, &default_pricing());
        assert_eq!(price.bathroom_price, dec!(48));
    }

    #[test]
    fn test_laundry_scales_per_person() {
        let mut request = house_request();
        request.frequency = "one-time".to_string();
        request.laundry_persons = 3;
        let price = calculate(&request, &default_pricing());
        assert_eq!(price.laundry_price, dec!(120));
        assert_eq!(price.subtotal, dec!(309));
    }

    #[test]
    fn test_subtotal_is_sum_of_components() {
        let mut request = house_request();
        request.extras = vec!["inside-oven".to_string()];
        request.laundry_persons = 2;
        let price = calculate(&request, &default_pricing());

        let expected = price.type_price
            + price.kitchen_price
            + price.bathroom_price
            + price.bedroom_price
            + price.living_room_price
            + price.extras_price
            + price.laundry_price;
        assert_eq!(price.subtotal, expected);
        assert_eq!(price.total, price.subtotal - price.discount_amount);
    }

    #[test]
    fn test_calculate_is_idempotent() {
        let request = house_request();
        let config = default_pricing();
        assert_eq!(calculate(&request, &config), calculate(&request, &config));
    }

    #[test]
    fn test_empty_config_prices_at_fallback_only() {
        let config = PricingConfig {
            cleaning_types: Default::default(),
            frequencies: Default::default(),
            kitchens: Default::default(),
            bathrooms: Default::default(),
            bedrooms: Default::default(),
            living_rooms: Default::default(),
            extras: Default::default(),
            laundry_per_person: Decimal::ZERO,
        };
        let price = calculate(&house_request(), &config);
        assert_eq!(price.subtotal, FALLBACK_TYPE_PRICE);
        assert_eq!(price.total, FALLBACK_TYPE_PRICE);
    }
}
