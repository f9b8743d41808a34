use sea_orm::entity::prelude::*;

use crate::domain::DeliveryZone;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "delivery_zones")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub min_radius_km: f64,
    pub max_radius_km: f64,
    pub price: i64,
}

impl From<Model> for DeliveryZone {
    fn from(model: Model) -> Self {
        DeliveryZone {
            min_radius: model.min_radius_km,
            max_radius: model.max_radius_km,
            price: model.price,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
