//! The pricing rate table.
//!
//! A single active config lives as JSONB in `pricing_settings`. Reads are
//! defensive: a missing or malformed record falls back to the hardcoded
//! default table so the public forms always have rates to work with. Writes
//! are strict: the admin save path rejects tables that would leave the
//! calculator without the keys the forms offer.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Base price applied when a cleaning type is missing from the table.
pub const FALLBACK_TYPE_PRICE: Decimal = dec!(110);

/// A labeled flat price (cleaning types, extras)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    pub label: String,
    pub price: Decimal,
}

/// A labeled discount fraction in [0, 1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub label: String,
    pub discount: Decimal,
}

/// The full rate table, stored as one JSONB document.
///
/// Bathroom/bedroom counts are string keys because the forms offer half
/// increments ("1.5"); kitchen/living-room counts are whole numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
    pub cleaning_types: BTreeMap<String, RateEntry>,
    pub frequencies: BTreeMap<String, FrequencyEntry>,
    #[serde(default)]
    pub kitchens: BTreeMap<u32, Decimal>,
    #[serde(default)]
    pub bathrooms: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub bedrooms: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub living_rooms: BTreeMap<u32, Decimal>,
    pub extras: BTreeMap<String, RateEntry>,
    #[serde(default)]
    pub laundry_per_person: Decimal,
}

/// Cleaning type keys the public house form offers.
const FORM_CLEANING_TYPES: [&str; 3] = ["standard", "deep", "move-in-out"];
/// Frequency keys the public house form offers.
const FORM_FREQUENCIES: [&str; 4] = ["one-time", "weekly", "every-other-week", "every-4-weeks"];
/// Extra keys the public house form offers.
const FORM_EXTRAS: [&str; 5] = ["inside-fridge", "inside-oven", "inside-cabinets", "dishes", "pets"];
const FORM_MAX_KITCHENS: u32 = 4;
const FORM_MAX_LIVING_ROOMS: u32 = 8;
const FORM_MAX_HALF_ROOMS: u32 = 8;

impl PricingConfig {
    /// Parse a stored JSONB document, or None if it is malformed.
    ///
    /// The stored value must at least carry the `cleaningTypes`,
    /// `frequencies` and `extras` sections; the room tables may be absent
    /// and default to empty (each lookup then contributes zero).
    pub fn from_stored(value: serde_json::Value) -> Option<Self> {
        let obj = value.as_object()?;
        for section in ["cleaningTypes", "frequencies", "extras"] {
            if !obj.contains_key(section) {
                return None;
            }
        }
        serde_json::from_value(value).ok()
    }

    /// Strict validation for the admin save path.
    ///
    /// Collects every violation rather than stopping at the first one.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut violations = Vec::new();

        for key in FORM_CLEANING_TYPES {
            if !self.cleaning_types.contains_key(key) {
                violations.push(format!("cleaningTypes is missing '{key}'"));
            }
        }
        for key in FORM_FREQUENCIES {
            if !self.frequencies.contains_key(key) {
                violations.push(format!("frequencies is missing '{key}'"));
            }
        }
        for key in FORM_EXTRAS {
            if !self.extras.contains_key(key) {
                violations.push(format!("extras is missing '{key}'"));
            }
        }
        for count in 0..=FORM_MAX_KITCHENS {
            if !self.kitchens.contains_key(&count) {
                violations.push(format!("kitchens is missing count {count}"));
            }
        }
        for count in 0..=FORM_MAX_LIVING_ROOMS {
            if !self.living_rooms.contains_key(&count) {
                violations.push(format!("livingRooms is missing count {count}"));
            }
        }
        for key in half_count_keys() {
            if !self.bathrooms.contains_key(&key) {
                violations.push(format!("bathrooms is missing count {key}"));
            }
            if !self.bedrooms.contains_key(&key) {
                violations.push(format!("bedrooms is missing count {key}"));
            }
        }

        for (key, entry) in &self.cleaning_types {
            if entry.price < Decimal::ZERO {
                violations.push(format!("cleaningTypes.{key} price is negative"));
            }
        }
        for (key, entry) in &self.frequencies {
            if entry.discount < Decimal::ZERO || entry.discount >= Decimal::ONE {
                violations.push(format!("frequencies.{key} discount must be in [0, 1)"));
            }
        }
        for (key, entry) in &self.extras {
            if entry.price < Decimal::ZERO {
                violations.push(format!("extras.{key} price is negative"));
            }
        }
        for (table, prices) in [("bathrooms", &self.bathrooms), ("bedrooms", &self.bedrooms)] {
            for (key, price) in prices.iter() {
                if *price < Decimal::ZERO {
                    violations.push(format!("{table}.{key} price is negative"));
                }
            }
        }
        for (table, prices) in [("kitchens", &self.kitchens), ("livingRooms", &self.living_rooms)] {
            for (count, price) in prices.iter() {
                if *price < Decimal::ZERO {
                    violations.push(format!("{table}.{count} price is negative"));
                }
            }
        }
        if self.laundry_per_person < Decimal::ZERO {
            violations.push("laundryPerPerson is negative".to_string());
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// "0", "1", "1.5", ... "8" — the bathroom/bedroom counts the forms offer.
fn half_count_keys() -> Vec<String> {
    let mut keys = vec!["0".to_string()];
    for whole in 1..=FORM_MAX_HALF_ROOMS {
        keys.push(whole.to_string());
        if whole < FORM_MAX_HALF_ROOMS {
            keys.push(format!("{whole}.5"));
        }
    }
    keys
}

/// The production default rate card. Used whenever no active config exists
/// or the stored one fails the section check.
pub fn default_pricing() -> PricingConfig {
    let cleaning_types = BTreeMap::from([
        (
            "standard".to_string(),
            RateEntry { label: "Standard".to_string(), price: dec!(110) },
        ),
        (
            "deep".to_string(),
            RateEntry { label: "Deep Cleaning".to_string(), price: dec!(125) },
        ),
        (
            "move-in-out".to_string(),
            RateEntry { label: "Move In-Out".to_string(), price: dec!(140) },
        ),
    ]);

    let frequencies = BTreeMap::from([
        (
            "one-time".to_string(),
            FrequencyEntry { label: "One-Time".to_string(), discount: dec!(0) },
        ),
        (
            "weekly".to_string(),
            FrequencyEntry { label: "Weekly".to_string(), discount: dec!(0.20) },
        ),
        (
            "every-other-week".to_string(),
            FrequencyEntry { label: "Every other week".to_string(), discount: dec!(0.15) },
        ),
        (
            "every-4-weeks".to_string(),
            FrequencyEntry { label: "Every 4 weeks".to_string(), discount: dec!(0.10) },
        ),
    ]);

    let kitchens = BTreeMap::from([
        (0, dec!(0)),
        (1, dec!(45)),
        (2, dec!(90)),
        (3, dec!(135)),
        (4, dec!(180)),
    ]);

    let bathrooms = BTreeMap::from([
        ("0".to_string(), dec!(0)),
        ("1".to_string(), dec!(24)),
        ("1.5".to_string(), dec!(48)),
        ("2".to_string(), dec!(66)),
        ("2.5".to_string(), dec!(84)),
        ("3".to_string(), dec!(102)),
        ("3.5".to_string(), dec!(120)),
        ("4".to_string(), dec!(138)),
        ("4.5".to_string(), dec!(156)),
        ("5".to_string(), dec!(174)),
        ("5.5".to_string(), dec!(192)),
        ("6".to_string(), dec!(210)),
        ("6.5".to_string(), dec!(228)),
        ("7".to_string(), dec!(246)),
        ("7.5".to_string(), dec!(264)),
        ("8".to_string(), dec!(282)),
    ]);

    let bedrooms = BTreeMap::from([
        ("0".to_string(), dec!(0)),
        ("1".to_string(), dec!(10)),
        ("1.5".to_string(), dec!(18)),
        ("2".to_string(), dec!(36)),
        ("2.5".to_string(), dec!(54)),
        ("3".to_string(), dec!(72)),
        ("3.5".to_string(), dec!(90)),
        ("4".to_string(), dec!(108)),
        ("4.5".to_string(), dec!(126)),
        ("5".to_string(), dec!(144)),
        ("5.5".to_string(), dec!(162)),
        ("6".to_string(), dec!(180)),
        ("6.5".to_string(), dec!(198)),
        ("7".to_string(), dec!(216)),
        ("7.5".to_string(), dec!(234)),
        ("8".to_string(), dec!(252)),
    ]);

    let living_rooms = BTreeMap::from([
        (0, dec!(0)),
        (1, dec!(0)),
        (2, dec!(24)),
        (3, dec!(48)),
        (4, dec!(72)),
        (5, dec!(96)),
        (6, dec!(120)),
        (7, dec!(144)),
        (8, dec!(168)),
    ]);

    let extras = BTreeMap::from([
        (
            "inside-fridge".to_string(),
            RateEntry { label: "Inside Fridge".to_string(), price: dec!(50) },
        ),
        (
            "inside-oven".to_string(),
            RateEntry { label: "Inside Oven".to_string(), price: dec!(50) },
        ),
        (
            "inside-cabinets".to_string(),
            RateEntry { label: "Inside Cabinets".to_string(), price: dec!(40) },
        ),
        (
            "dishes".to_string(),
            RateEntry { label: "Dishes".to_string(), price: dec!(40) },
        ),
        (
            "pets".to_string(),
            RateEntry { label: "Pets".to_string(), price: dec!(20) },
        ),
    ]);

    PricingConfig {
        cleaning_types,
        frequencies,
        kitchens,
        bathrooms,
        bedrooms,
        living_rooms,
        extras,
        laundry_per_person: dec!(40),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_table_passes_strict_validation() {
        assert_eq!(default_pricing().validate(), Ok(()));
    }

    #[test]
    fn default_table_roundtrips_through_json() {
        let config = default_pricing();
        let value = serde_json::to_value(&config).unwrap();
        let restored = PricingConfig::from_stored(value).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn stored_config_missing_required_section_is_rejected() {
        let mut value = serde_json::to_value(default_pricing()).unwrap();
        value.as_object_mut().unwrap().remove("frequencies");
        assert!(PricingConfig::from_stored(value).is_none());
    }

    #[test]
    fn stored_config_without_room_tables_still_parses() {
        let value = json!({
            "cleaningTypes": { "standard": { "label": "Standard", "price": 110 } },
            "frequencies": { "one-time": { "label": "One-Time", "discount": 0 } },
            "extras": { "pets": { "label": "Pets", "price": 20 } },
        });
        let config = PricingConfig::from_stored(value).unwrap();
        assert!(config.kitchens.is_empty());
        assert_eq!(config.laundry_per_person, Decimal::ZERO);
    }

    #[test]
    fn non_object_stored_config_is_rejected() {
        assert!(PricingConfig::from_stored(json!("oops")).is_none());
        assert!(PricingConfig::from_stored(json!(null)).is_none());
    }

    #[test]
    fn validation_flags_negative_prices_and_bad_discounts() {
        let mut config = default_pricing();
        config.cleaning_types.get_mut("deep").unwrap().price = dec!(-1);
        config.frequencies.get_mut("weekly").unwrap().discount = dec!(1);
        let violations = config.validate().unwrap_err();
        assert!(violations.iter().any(|v| v.contains("cleaningTypes.deep")));
        assert!(violations.iter().any(|v| v.contains("frequencies.weekly")));
    }

    #[test]
    fn validation_flags_missing_form_counts() {
        let mut config = default_pricing();
        config.bathrooms.remove("1.5");
        config.kitchens.remove(&3);
        let violations = config.validate().unwrap_err();
        assert!(violations.iter().any(|v| v.contains("bathrooms is missing count 1.5")));
        assert!(violations.iter().any(|v| v.contains("kitchens is missing count 3")));
    }
}
