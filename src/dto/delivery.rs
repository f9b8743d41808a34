use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::DeliveryZone;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CheckAddressRequest {
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub postal_code: String,
    #[validate(length(min = 1))]
    pub street: String,
    #[validate(length(min = 1))]
    pub building_number: String,
}

impl CheckAddressRequest {
    pub fn to_query(&self) -> String {
        format!(
            "{} {}, {} {}",
            self.street.trim(),
            self.building_number.trim(),
            self.postal_code.trim(),
            self.city.trim()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DeliveryQuote {
    pub in_delivery_area: bool,
    pub distance_km: Option<f64>,
    pub price: Option<i64>,
}

impl DeliveryQuote {
    pub fn outside() -> Self {
        Self {
            in_delivery_area: false,
            distance_km: None,
            price: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ZoneList {
    pub zones: Vec<DeliveryZone>,
}
