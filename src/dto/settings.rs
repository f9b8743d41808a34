use chrono::NaiveTime;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Partial update. For nullable fields, `null` clears the value and an
/// absent key leaves it untouched.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSettingsRequest {
    pub ordering_open: Option<bool>,
    #[validate(range(min = 0, max = 600))]
    pub order_wait_minutes: Option<i32>,
    #[serde(default, deserialize_with = "super::nullable")]
    #[schema(value_type = Option<String>, example = "12:00:00")]
    pub pizza_available_from: Option<Option<NaiveTime>>,
    #[serde(default, deserialize_with = "super::nullable")]
    #[schema(value_type = Option<String>, example = "22:00:00")]
    pub pizza_available_until: Option<Option<NaiveTime>>,
    #[serde(default, deserialize_with = "super::nullable")]
    #[schema(value_type = Option<i64>)]
    pub delivery_cost_fallback: Option<Option<i64>>,
}
