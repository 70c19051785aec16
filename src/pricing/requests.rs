//! Request DTOs for pricing API endpoints.

use serde::Deserialize;

use super::calculators::ServiceRequest;

/// Body of a live estimate request. Every field defaults so a half-filled
/// form can still ask for a breakdown.
#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    #[serde(default)]
    pub cleaning_type: String,
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
}

fn zero_count() -> String {
    "0".to_string()
}

impl From<EstimateRequest> for ServiceRequest {
    fn from(req: EstimateRequest) -> Self {
        ServiceRequest {
            cleaning_type: req.cleaning_type,
            frequency: req.frequency,
            kitchens: req.kitchens,
            bathrooms: req.bathrooms,
            bedrooms: req.bedrooms,
            living_rooms: req.living_rooms,
            extras: req.extras,
            laundry_persons: req.laundry_persons,
        }
    }
}
