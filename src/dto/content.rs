use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Banner, MainBanner, News};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBannerRequest {
    #[validate(url)]
    pub image_url: String,
    #[validate(url)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBannerRequest {
    #[validate(url)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    #[schema(value_type = Option<String>)]
    pub link_url: Option<Option<String>>,
    pub position: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMainBannerRequest {
    #[validate(url)]
    pub desktop_image_url: String,
    #[validate(url)]
    pub mobile_image_url: String,
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateMainBannerRequest {
    #[validate(url)]
    pub desktop_image_url: Option<String>,
    #[validate(url)]
    pub mobile_image_url: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<String>>,
    pub position: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateNewsRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[validate(url)]
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateNewsRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BannerList {
    pub items: Vec<Banner>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MainBannerList {
    pub items: Vec<MainBanner>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NewsList {
    pub items: Vec<News>,
}
