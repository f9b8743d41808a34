use sea_orm::entity::prelude::*;

/// Single-row table; the row id is always [`SETTINGS_ID`].
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub ordering_open: bool,
    pub order_wait_minutes: i32,
    pub pizza_available_from: Option<Time>,
    pub pizza_available_until: Option<Time>,
    pub delivery_cost_fallback: Option<i64>,
    pub updated_at: DateTimeWithTimeZone,
}

pub const SETTINGS_ID: i32 = 1;

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
