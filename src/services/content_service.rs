use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, EntityTrait, QueryOrder, Set};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::content::{
        BannerList, CreateBannerRequest, CreateMainBannerRequest, CreateNewsRequest,
        MainBannerList, NewsList, UpdateBannerRequest, UpdateMainBannerRequest, UpdateNewsRequest,
    },
    entity::{
        banners::{self, Entity as Banners},
        main_banners::{self, Entity as MainBanners},
        news::{self, Entity as News},
    },
    error::{AppError, AppResult},
    middleware::auth::AdminUser,
    models,
    response::{ApiResponse, Meta},
    state::AppState,
};

async fn deleted(
    state: &AppState,
    AdminUser(user): &AdminUser,
    rows_affected: u64,
    action: &str,
    resource: &str,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    audit::record(state, Some(user.user_id), action, resource, serde_json::json!({ "id": id })).await;
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

// banners

pub async fn list_banners(state: &AppState) -> AppResult<ApiResponse<BannerList>> {
    let items = Banners::find()
        .order_by_asc(banners::Column::Position)
        .order_by_asc(banners::Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(models::Banner::from)
        .collect();
    Ok(ApiResponse::success("Banners", BannerList { items }, None))
}

pub async fn create_banner(
    state: &AppState,
    admin: &AdminUser,
    payload: CreateBannerRequest,
) -> AppResult<ApiResponse<models::Banner>> {
    payload.validate()?;
    let banner = banners::ActiveModel {
        id: Set(Uuid::new_v4()),
        image_url: Set(payload.image_url),
        link_url: Set(payload.link_url),
        position: Set(payload.position),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        Some(admin.0.user_id),
        "banner_create",
        "banners",
        serde_json::json!({ "id": banner.id }),
    )
    .await;
    Ok(ApiResponse::success("Banner created", banner.into(), Some(Meta::empty())))
}

pub async fn update_banner(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
    payload: UpdateBannerRequest,
) -> AppResult<ApiResponse<models::Banner>> {
    payload.validate()?;
    let existing = Banners::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: banners::ActiveModel = existing.into();
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(image_url);
    }
    if let Some(link_url) = payload.link_url {
        active.link_url = Set(link_url);
    }
    if let Some(position) = payload.position {
        active.position = Set(position);
    }
    let banner = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(admin.0.user_id),
        "banner_update",
        "banners",
        serde_json::json!({ "id": banner.id }),
    )
    .await;
    Ok(ApiResponse::success("Updated", banner.into(), Some(Meta::empty())))
}

pub async fn delete_banner(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Banners::delete_by_id(id).exec(&state.orm).await?;
    deleted(state, admin, result.rows_affected, "banner_delete", "banners", id).await
}

// main page banners

pub async fn list_main_banners(state: &AppState) -> AppResult<ApiResponse<MainBannerList>> {
    let items = MainBanners::find()
        .order_by_asc(main_banners::Column::Position)
        .order_by_asc(main_banners::Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(models::MainBanner::from)
        .collect();
    Ok(ApiResponse::success("Main banners", MainBannerList { items }, None))
}

pub async fn create_main_banner(
    state: &AppState,
    admin: &AdminUser,
    payload: CreateMainBannerRequest,
) -> AppResult<ApiResponse<models::MainBanner>> {
    payload.validate()?;
    let banner = main_banners::ActiveModel {
        id: Set(Uuid::new_v4()),
        desktop_image_url: Set(payload.desktop_image_url),
        mobile_image_url: Set(payload.mobile_image_url),
        title: Set(payload.title),
        position: Set(payload.position),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        Some(admin.0.user_id),
        "main_banner_create",
        "main_banners",
        serde_json::json!({ "id": banner.id }),
    )
    .await;
    Ok(ApiResponse::success("Main banner created", banner.into(), Some(Meta::empty())))
}

pub async fn update_main_banner(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
    payload: UpdateMainBannerRequest,
) -> AppResult<ApiResponse<models::MainBanner>> {
    payload.validate()?;
    let existing = MainBanners::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: main_banners::ActiveModel = existing.into();
    if let Some(url) = payload.desktop_image_url {
        active.desktop_image_url = Set(url);
    }
    if let Some(url) = payload.mobile_image_url {
        active.mobile_image_url = Set(url);
    }
    if let Some(title) = payload.title {
        active.title = Set(title);
    }
    if let Some(position) = payload.position {
        active.position = Set(position);
    }
    let banner = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(admin.0.user_id),
        "main_banner_update",
        "main_banners",
        serde_json::json!({ "id": banner.id }),
    )
    .await;
    Ok(ApiResponse::success("Updated", banner.into(), Some(Meta::empty())))
}

pub async fn delete_main_banner(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = MainBanners::delete_by_id(id).exec(&state.orm).await?;
    deleted(state, admin, result.rows_affected, "main_banner_delete", "main_banners", id).await
}

// news

pub async fn list_news(state: &AppState) -> AppResult<ApiResponse<NewsList>> {
    let items = News::find()
        .order_by_desc(news::Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(models::News::from)
        .collect();
    Ok(ApiResponse::success("News", NewsList { items }, None))
}

pub async fn create_news(
    state: &AppState,
    admin: &AdminUser,
    payload: CreateNewsRequest,
) -> AppResult<ApiResponse<models::News>> {
    payload.validate()?;
    let entry = news::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(payload.title),
        content: Set(payload.content),
        image_url: Set(payload.image_url),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        Some(admin.0.user_id),
        "news_create",
        "news",
        serde_json::json!({ "id": entry.id }),
    )
    .await;
    Ok(ApiResponse::success("News created", entry.into(), Some(Meta::empty())))
}

pub async fn update_news(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
    payload: UpdateNewsRequest,
) -> AppResult<ApiResponse<models::News>> {
    payload.validate()?;
    let existing = News::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: news::ActiveModel = existing.into();
    if let Some(title) = payload.title {
        active.title = Set(title);
    }
    if let Some(content) = payload.content {
        active.content = Set(content);
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(image_url);
    }
    let entry = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(admin.0.user_id),
        "news_update",
        "news",
        serde_json::json!({ "id": entry.id }),
    )
    .await;
    Ok(ApiResponse::success("Updated", entry.into(), Some(Meta::empty())))
}

pub async fn delete_news(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = News::delete_by_id(id).exec(&state.orm).await?;
    deleted(state, admin, result.rows_affected, "news_delete", "news", id).await
}
