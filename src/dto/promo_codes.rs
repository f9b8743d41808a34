use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::{
    domain::DiscountType,
    models::{DeliveryTime, PromoCode},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ValidatePromoCodeRequest {
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    /// The order's delivery time; omitted or `"ASAP"` checks against now.
    #[schema(value_type = Option<String>, example = "ASAP")]
    pub delivery_time: Option<DeliveryTime>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MarkPromoCodeUsedRequest {
    #[validate(length(min = 1, max = 50))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PromoValidation {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_new_code"))]
pub struct CreatePromoCodeRequest {
    #[validate(length(min = 3, max = 50))]
    pub code: String,
    pub discount_type: DiscountType,
    #[validate(range(min = 1))]
    pub discount_value: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_one_time_use: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePromoCodeRequest {
    #[validate(length(min = 3, max = 50))]
    pub code: Option<String>,
    pub discount_type: Option<DiscountType>,
    #[validate(range(min = 1))]
    pub discount_value: Option<i64>,
    pub is_active: Option<bool>,
    pub is_one_time_use: Option<bool>,
    pub is_used: Option<bool>,
    #[serde(default, deserialize_with = "super::nullable")]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub start_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "super::nullable")]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PromoCodeList {
    pub items: Vec<PromoCode>,
}

fn validate_new_code(req: &CreatePromoCodeRequest) -> Result<(), ValidationError> {
    if req.discount_type == DiscountType::Percentage && req.discount_value > 100 {
        return Err(ValidationError::new("percentage_over_100"));
    }
    if let (Some(start), Some(end)) = (req.start_date, req.expires_at) {
        if start >= end {
            return Err(ValidationError::new("empty_date_range"));
        }
    }
    Ok(())
}

fn default_true() -> bool {
    true
}
