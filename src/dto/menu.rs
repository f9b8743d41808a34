use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{domain::MenuCategory, models::MenuItem};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMenuItemRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(range(min = 0))]
    pub price: i64,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub category: MenuCategory,
    #[validate(url)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_orderable: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_recommended: bool,
    #[serde(default)]
    pub is_on_main_page: bool,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateMenuItemRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(range(min = 0))]
    pub price: Option<i64>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub category: Option<MenuCategory>,
    #[validate(url)]
    pub image_url: Option<String>,
    pub is_orderable: Option<bool>,
    pub is_active: Option<bool>,
    pub is_recommended: Option<bool>,
    pub is_on_main_page: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuList {
    pub items: Vec<MenuItem>,
}

fn default_true() -> bool {
    true
}
