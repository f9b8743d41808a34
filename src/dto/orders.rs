use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    domain::{DeliveryMethod, OrderStatus, PaymentMethod, status::StatusStep},
    models::{DeliveryTime, Order, OrderItem},
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderItemInput {
    pub menu_item_id: Uuid,
    #[validate(range(min = 1, max = 99))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct OrderAddress {
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(custom(function = "validate_postal_code"))]
    pub postal_code: String,
    #[validate(length(min = 1, max = 150))]
    pub street: String,
    #[validate(length(min = 1, max = 20))]
    pub building_number: String,
    #[validate(length(max = 20))]
    pub apartment: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_create_order"))]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, max = 100))]
    pub customer_name: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    pub delivery_method: DeliveryMethod,
    pub payment_method: PaymentMethod,
    #[schema(value_type = String, example = "ASAP")]
    pub delivery_time: DeliveryTime,
    /// Required and validated for delivery orders, ignored for take-out.
    pub address: Option<OrderAddress>,
    #[validate(custom(function = "validate_nip"))]
    pub nip: Option<String>,
    #[validate(length(max = 500))]
    pub comment: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub promo_code: Option<String>,
    #[validate(length(min = 1), nested)]
    pub items: Vec<OrderItemInput>,
    /// Minor units, at most 100 000 000.
    #[validate(range(min = 0, max = 100_000_000))]
    pub total_amount: i64,
    #[validate(range(min = 0, max = 100_000_000))]
    pub final_amount: i64,
    /// Lets a client retry a submission without creating a second order.
    #[validate(length(min = 8, max = 64))]
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedOrder {
    pub id: Uuid,
    pub phone: String,
    pub customer_name: String,
    pub delivery_method: DeliveryMethod,
    #[schema(value_type = String, example = "ASAP")]
    pub delivery_time: DeliveryTime,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PublicOrderQuery {
    pub phone: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusTable {
    pub delivery: Vec<StatusStep>,
    pub take_out: Vec<StatusStep>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrdersSinceQuery {
    #[serde(rename = "lastUpdatedAt")]
    pub last_updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrdersSince {
    pub orders: Vec<Order>,
    /// Pass back as `lastUpdatedAt` on the next poll.
    pub server_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotifyPendingRequest {
    pub order_id: Uuid,
    #[validate(length(min = 1))]
    pub phone: String,
    pub final_amount: i64,
    #[validate(length(min = 1))]
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SweepReport {
    pub notified: Vec<Order>,
}

fn validate_create_order(req: &CreateOrderRequest) -> Result<(), ValidationError> {
    if req.final_amount > req.total_amount {
        return Err(ValidationError::new("final_amount_exceeds_total")
            .with_message("final amount cannot exceed the total".into()));
    }
    if req.delivery_method == DeliveryMethod::TakeOut {
        return Ok(());
    }
    let Some(address) = &req.address else {
        return Err(ValidationError::new("address_required")
            .with_message("address is required for delivery orders".into()));
    };
    address.validate().map_err(|errors| {
        let mut fields: Vec<_> = errors.field_errors().into_keys().collect();
        fields.sort();
        ValidationError::new("address_invalid")
            .with_message(format!("invalid address fields: {}", fields.join(", ")).into())
    })
}

/// 9 to 15 digits, optional leading `+`, spaces and dashes ignored.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let trimmed = phone.trim();
    let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let mut digits = 0;
    for c in body.chars() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' => {}
            _ => return Err(ValidationError::new("phone_format")),
        }
    }
    if (9..=15).contains(&digits) {
        Ok(())
    } else {
        Err(ValidationError::new("phone_length"))
    }
}

fn validate_postal_code(code: &str) -> Result<(), ValidationError> {
    let ok = code.len() == 6
        && code
            .char_indices()
            .all(|(i, c)| if i == 2 { c == '-' } else { c.is_ascii_digit() });
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new("postal_code_format"))
    }
}

fn validate_nip(nip: &str) -> Result<(), ValidationError> {
    let digits: Vec<char> = nip.chars().filter(|c| *c != '-' && *c != ' ').collect();
    if digits.len() == 10 && digits.iter().all(char::is_ascii_digit) {
        Ok(())
    } else {
        Err(ValidationError::new("nip_format"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateOrderRequest {
        CreateOrderRequest {
            customer_name: "Jan".into(),
            phone: "+48 600 100 200".into(),
            delivery_method: DeliveryMethod::TakeOut,
            payment_method: PaymentMethod::Cash,
            delivery_time: DeliveryTime::Asap,
            address: None,
            nip: None,
            comment: None,
            promo_code: None,
            items: vec![OrderItemInput {
                menu_item_id: Uuid::new_v4(),
                quantity: 2,
            }],
            total_amount: 4000,
            final_amount: 4000,
            idempotency_key: None,
        }
    }

    #[test]
    fn take_out_without_address_is_valid() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn delivery_requires_address() {
        let req = CreateOrderRequest {
            delivery_method: DeliveryMethod::Delivery,
            ..request()
        };
        assert!(req.validate().is_err());

        let req = CreateOrderRequest {
            address: Some(OrderAddress {
                city: "Warszawa".into(),
                postal_code: "00-001".into(),
                street: "Marszałkowska".into(),
                building_number: "10".into(),
                apartment: None,
            }),
            ..req
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn take_out_ignores_a_malformed_address() {
        let broken = OrderAddress {
            city: String::new(),
            postal_code: "not-a-code".into(),
            street: "Marszałkowska".into(),
            building_number: "10".into(),
            apartment: None,
        };
        let req = CreateOrderRequest {
            address: Some(broken.clone()),
            ..request()
        };
        assert!(req.validate().is_ok());

        let req = CreateOrderRequest {
            delivery_method: DeliveryMethod::Delivery,
            address: Some(broken),
            ..request()
        };
        let err = req.validate().unwrap_err().to_string();
        assert!(err.contains("postal_code"), "{err}");
    }

    #[test]
    fn empty_cart_and_zero_quantity_are_rejected() {
        let req = CreateOrderRequest {
            items: vec![],
            ..request()
        };
        assert!(req.validate().is_err());

        let req = CreateOrderRequest {
            items: vec![OrderItemInput {
                menu_item_id: Uuid::new_v4(),
                quantity: 0,
            }],
            ..request()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn final_amount_cannot_exceed_total() {
        let req = CreateOrderRequest {
            final_amount: 5000,
            ..request()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn amounts_are_capped() {
        let req = CreateOrderRequest {
            total_amount: 100_000_000,
            final_amount: 100_000_000,
            ..request()
        };
        assert!(req.validate().is_ok());

        let req = CreateOrderRequest {
            total_amount: 9_000_000_000_000_000_000,
            final_amount: 0,
            promo_code: Some("SUMMER10".into()),
            ..request()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn phone_rules() {
        assert!(validate_phone("600100200").is_ok());
        assert!(validate_phone("+48 600-100-200").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("600abc200").is_err());
    }

    #[test]
    fn nip_and_postal_code_rules() {
        assert!(validate_nip("123-456-78-90").is_ok());
        assert!(validate_nip("12345").is_err());
        assert!(validate_postal_code("00-950").is_ok());
        assert!(validate_postal_code("00950").is_err());
    }
}
