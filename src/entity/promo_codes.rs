use chrono::Utc;
use sea_orm::entity::prelude::*;

use crate::domain::{DiscountType, promo::PromoTerms};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "promo_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub is_active: bool,
    pub is_one_time_use: bool,
    pub is_used: bool,
    pub start_date: Option<DateTimeWithTimeZone>,
    pub expires_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn terms(&self) -> PromoTerms {
        PromoTerms {
            is_active: self.is_active,
            is_one_time_use: self.is_one_time_use,
            is_used: self.is_used,
            start_date: self.start_date.map(|dt| dt.with_timezone(&Utc)),
            expires_at: self.expires_at.map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
