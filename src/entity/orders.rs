use sea_orm::entity::prelude::*;

use crate::domain::{DeliveryMethod, OrderStatus, PaymentMethod};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_name: String,
    pub phone: String,
    pub delivery_method: DeliveryMethod,
    pub payment_method: PaymentMethod,
    /// `None` means as soon as possible.
    pub delivery_time: Option<DateTimeWithTimeZone>,
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
    pub status_updated_at: DateTimeWithTimeZone,
    pub notified_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(unique)]
    pub idempotency_key: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
