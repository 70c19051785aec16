//! Response DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::CalculatedPrice;

/// Itemized price breakdown for JSON responses
#[derive(Debug, Serialize)]
pub struct PriceBreakdownResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub type_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub kitchen_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub bathroom_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub bedroom_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub living_room_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub extras_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub laundry_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount_percent: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
}

impl From<CalculatedPrice> for PriceBreakdownResponse {
    fn from(price: CalculatedPrice) -> Self {
        Self {
            type_price: price.type_price,
            kitchen_price: price.kitchen_price,
            bathroom_price: price.bathroom_price,
            bedroom_price: price.bedroom_price,
            living_room_price: price.living_room_price,
            extras_price: price.extras_price,
            laundry_price: price.laundry_price,
            subtotal: price.subtotal,
            discount_percent: price.discount_percent,
            discount_amount: price.discount_amount,
            total: price.total,
        }
    }
}
