use chrono::NaiveTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MenuCategory {
    #[sea_orm(string_value = "PIZZA")]
    Pizza,
    #[sea_orm(string_value = "PASTA")]
    Pasta,
    #[sea_orm(string_value = "BURGERS")]
    Burgers,
    #[sea_orm(string_value = "SALADS")]
    Salads,
    #[sea_orm(string_value = "SOUPS")]
    Soups,
    #[sea_orm(string_value = "APPETIZERS")]
    Appetizers,
    #[sea_orm(string_value = "DESSERTS")]
    Desserts,
    #[sea_orm(string_value = "DRINKS")]
    Drinks,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "CASH")]
    Cash,
    #[sea_orm(string_value = "CARD")]
    Card,
    #[sea_orm(string_value = "ONLINE")]
    Online,
}

/// Pizza is only served inside its window. A window whose end is before its
/// start wraps past midnight. No window configured means always available.
pub fn pizza_window_open(
    from: Option<NaiveTime>,
    until: Option<NaiveTime>,
    now: NaiveTime,
) -> bool {
    match (from, until) {
        (Some(from), Some(until)) if from <= until => now >= from && now < until,
        (Some(from), Some(until)) => now >= from || now < until,
        (Some(from), None) => now >= from,
        (None, Some(until)) => now < until,
        (None, None) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn daytime_window() {
        let (from, until) = (Some(t(12, 0)), Some(t(22, 0)));
        assert!(!pizza_window_open(from, until, t(11, 59)));
        assert!(pizza_window_open(from, until, t(12, 0)));
        assert!(pizza_window_open(from, until, t(21, 59)));
        assert!(!pizza_window_open(from, until, t(22, 0)));
    }

    #[test]
    fn window_wrapping_midnight() {
        let (from, until) = (Some(t(18, 0)), Some(t(2, 0)));
        assert!(pizza_window_open(from, until, t(23, 30)));
        assert!(pizza_window_open(from, until, t(1, 0)));
        assert!(!pizza_window_open(from, until, t(12, 0)));
    }

    #[test]
    fn no_window_is_always_open() {
        assert!(pizza_window_open(None, None, t(4, 0)));
    }
}
