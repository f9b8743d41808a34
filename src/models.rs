use chrono::{DateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::{DeliveryMethod, DiscountType, MenuCategory, OrderStatus, PaymentMethod},
    entity::{banners, main_banners, menu_items, news, order_items, orders, promo_codes, settings, users},
};

/// When the customer wants the order: `"ASAP"` on the wire, or an RFC 3339
/// instant. Explicit instants are kept at minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryTime {
    Asap,
    At(DateTime<Utc>),
}

impl DeliveryTime {
    pub fn truncated(self) -> Self {
        match self {
            DeliveryTime::Asap => DeliveryTime::Asap,
            DeliveryTime::At(at) => DeliveryTime::At(
                at.with_second(0)
                    .and_then(|t| t.with_nanosecond(0))
                    .unwrap_or(at),
            ),
        }
    }

    pub fn instant(self) -> Option<DateTime<Utc>> {
        match self {
            DeliveryTime::Asap => None,
            DeliveryTime::At(at) => Some(at),
        }
    }

    pub fn from_instant(at: Option<DateTime<Utc>>) -> Self {
        at.map_or(DeliveryTime::Asap, DeliveryTime::At)
    }
}

impl Serialize for DeliveryTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DeliveryTime::Asap => serializer.serialize_str("ASAP"),
            DeliveryTime::At(at) => at.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for DeliveryTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.eq_ignore_ascii_case("asap") {
            return Ok(DeliveryTime::Asap);
        }
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| DeliveryTime::At(at.with_timezone(&Utc)))
            .map_err(|err| de::Error::custom(format!("invalid delivery time {raw:?}: {err}")))
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MenuItem {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    pub description: Option<String>,
    pub category: MenuCategory,
    pub image_url: Option<String>,
    pub is_orderable: bool,
    pub is_active: bool,
    pub is_recommended: bool,
    pub is_on_main_page: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub customer_name: String,
    pub phone: String,
    pub delivery_method: DeliveryMethod,
    pub payment_method: PaymentMethod,
    #[schema(value_type = String, example = "ASAP")]
    pub delivery_time: DeliveryTime,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub street: Option<String>,
    pub building_number: Option<String>,
    pub apartment: Option<String>,
    pub nip: Option<String>,
    pub comment: Option<String>,
    pub promo_code: Option<String>,
    pub total_amount: i64,
    pub final_amount: i64,
    pub status: OrderStatus,
    pub status_updated_at: DateTime<Utc>,
    pub notified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PromoCode {
    pub id: Uuid,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub is_active: bool,
    pub is_one_time_use: bool,
    pub is_used: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Settings {
    pub ordering_open: bool,
    pub order_wait_minutes: i32,
    #[schema(value_type = Option<String>, example = "12:00:00")]
    pub pizza_available_from: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "22:00:00")]
    pub pizza_available_until: Option<NaiveTime>,
    pub delivery_cost_fallback: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Banner {
    pub id: Uuid,
    pub image_url: String,
    pub link_url: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MainBanner {
    pub id: Uuid,
    pub desktop_image_url: String,
    pub mobile_image_url: String,
    pub title: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct News {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            role: model.role,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<menu_items::Model> for MenuItem {
    fn from(model: menu_items::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
            description: model.description,
            category: model.category,
            image_url: model.image_url,
            is_orderable: model.is_orderable,
            is_active: model.is_active,
            is_recommended: model.is_recommended,
            is_on_main_page: model.is_on_main_page,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<orders::Model> for Order {
    fn from(model: orders::Model) -> Self {
        Self {
            id: model.id,
            customer_name: model.customer_name,
            phone: model.phone,
            delivery_method: model.delivery_method,
            payment_method: model.payment_method,
            delivery_time: DeliveryTime::from_instant(
                model.delivery_time.map(|dt| dt.with_timezone(&Utc)),
            ),
            city: model.city,
            postal_code: model.postal_code,
            street: model.street,
            building_number: model.building_number,
            apartment: model.apartment,
            nip: model.nip,
            comment: model.comment,
            promo_code: model.promo_code,
            total_amount: model.total_amount,
            final_amount: model.final_amount,
            status: model.status,
            status_updated_at: model.status_updated_at.with_timezone(&Utc),
            notified_at: model.notified_at.map(|dt| dt.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<order_items::Model> for OrderItem {
    fn from(model: order_items::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            menu_item_id: model.menu_item_id,
            quantity: model.quantity,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<promo_codes::Model> for PromoCode {
    fn from(model: promo_codes::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            discount_type: model.discount_type,
            discount_value: model.discount_value,
            is_active: model.is_active,
            is_one_time_use: model.is_one_time_use,
            is_used: model.is_used,
            start_date: model.start_date.map(|dt| dt.with_timezone(&Utc)),
            expires_at: model.expires_at.map(|dt| dt.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<settings::Model> for Settings {
    fn from(model: settings::Model) -> Self {
        Self {
            ordering_open: model.ordering_open,
            order_wait_minutes: model.order_wait_minutes,
            pizza_available_from: model.pizza_available_from,
            pizza_available_until: model.pizza_available_until,
            delivery_cost_fallback: model.delivery_cost_fallback,
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<banners::Model> for Banner {
    fn from(model: banners::Model) -> Self {
        Self {
            id: model.id,
            image_url: model.image_url,
            link_url: model.link_url,
            position: model.position,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<main_banners::Model> for MainBanner {
    fn from(model: main_banners::Model) -> Self {
        Self {
            id: model.id,
            desktop_image_url: model.desktop_image_url,
            mobile_image_url: model.mobile_image_url,
            title: model.title,
            position: model.position,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<news::Model> for News {
    fn from(model: news::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            image_url: model.image_url,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn asap_round_trips() {
        let json = serde_json::to_string(&DeliveryTime::Asap).unwrap();
        assert_eq!(json, "\"ASAP\"");
        let back: DeliveryTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DeliveryTime::Asap);
    }

    #[test]
    fn explicit_time_round_trips_at_minute_precision() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 18, 45, 37).unwrap();
        let sent = DeliveryTime::At(at).truncated();
        let json = serde_json::to_string(&sent).unwrap();
        let back: DeliveryTime = serde_json::from_str(&json).unwrap();
        assert_eq!(
            back,
            DeliveryTime::At(Utc.with_ymd_and_hms(2025, 6, 1, 18, 45, 0).unwrap())
        );
        assert_eq!(back.truncated(), back);
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let back: DeliveryTime = serde_json::from_str("\"2025-06-01T20:45:00+02:00\"").unwrap();
        assert_eq!(
            back,
            DeliveryTime::At(Utc.with_ymd_and_hms(2025, 6, 1, 18, 45, 0).unwrap())
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(serde_json::from_str::<DeliveryTime>("\"tomorrow-ish\"").is_err());
    }
}
