use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::content::{
        BannerList, CreateBannerRequest, CreateMainBannerRequest, CreateNewsRequest,
        MainBannerList, NewsList, UpdateBannerRequest, UpdateMainBannerRequest, UpdateNewsRequest,
    },
    error::AppResult,
    middleware::auth::AdminUser,
    models::{Banner, MainBanner, News},
    response::ApiResponse,
    services::content_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/banners", get(list_banners))
        .route("/main-banners", get(list_main_banners))
        .route("/news", get(list_news))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/banners", post(create_banner))
        .route("/banners/{id}", put(update_banner).delete(delete_banner))
        .route("/main-banners", post(create_main_banner))
        .route("/main-banners/{id}", put(update_main_banner).delete(delete_main_banner))
        .route("/news", post(create_news))
        .route("/news/{id}", put(update_news).delete(delete_news))
}

#[utoipa::path(
    get,
    path = "/api/content/banners",
    responses(
        (status = 200, description = "Banners ordered by position", body = ApiResponse<BannerList>)
    ),
    tag = "Content"
)]
pub async fn list_banners(State(state): State<AppState>) -> AppResult<Json<ApiResponse<BannerList>>> {
    let resp = content_service::list_banners(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/banners",
    request_body = CreateBannerRequest,
    responses(
        (status = 200, description = "Create banner", body = ApiResponse<Banner>),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Validation failed")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_banner(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<CreateBannerRequest>,
) -> AppResult<Json<ApiResponse<Banner>>> {
    let resp = content_service::create_banner(&state, &admin, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/banners/{id}",
    params(("id" = Uuid, Path, description = "Banner ID")),
    request_body = UpdateBannerRequest,
    responses(
        (status = 200, description = "Update banner", body = ApiResponse<Banner>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_banner(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBannerRequest>,
) -> AppResult<Json<ApiResponse<Banner>>> {
    let resp = content_service::update_banner(&state, &admin, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/banners/{id}",
    params(("id" = Uuid, Path, description = "Banner ID")),
    responses(
        (status = 200, description = "Delete banner"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_banner(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = content_service::delete_banner(&state, &admin, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/content/main-banners",
    responses(
        (status = 200, description = "Main page banners ordered by position", body = ApiResponse<MainBannerList>)
    ),
    tag = "Content"
)]
pub async fn list_main_banners(State(state): State<AppState>) -> AppResult<Json<ApiResponse<MainBannerList>>> {
    let resp = content_service::list_main_banners(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/main-banners",
    request_body = CreateMainBannerRequest,
    responses(
        (status = 200, description = "Create main banner", body = ApiResponse<MainBanner>),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Validation failed")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_main_banner(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<CreateMainBannerRequest>,
) -> AppResult<Json<ApiResponse<MainBanner>>> {
    let resp = content_service::create_main_banner(&state, &admin, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/main-banners/{id}",
    params(("id" = Uuid, Path, description = "Main banner ID")),
    request_body = UpdateMainBannerRequest,
    responses(
        (status = 200, description = "Update main banner", body = ApiResponse<MainBanner>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_main_banner(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMainBannerRequest>,
) -> AppResult<Json<ApiResponse<MainBanner>>> {
    let resp = content_service::update_main_banner(&state, &admin, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/main-banners/{id}",
    params(("id" = Uuid, Path, description = "Main banner ID")),
    responses(
        (status = 200, description = "Delete main banner"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_main_banner(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = content_service::delete_main_banner(&state, &admin, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/content/news",
    responses(
        (status = 200, description = "News, newest first", body = ApiResponse<NewsList>)
    ),
    tag = "Content"
)]
pub async fn list_news(State(state): State<AppState>) -> AppResult<Json<ApiResponse<NewsList>>> {
    let resp = content_service::list_news(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/news",
    request_body = CreateNewsRequest,
    responses(
        (status = 200, description = "Create news entry", body = ApiResponse<News>),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Validation failed")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_news(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<CreateNewsRequest>,
) -> AppResult<Json<ApiResponse<News>>> {
    let resp = content_service::create_news(&state, &admin, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/news/{id}",
    params(("id" = Uuid, Path, description = "News entry ID")),
    request_body = UpdateNewsRequest,
    responses(
        (status = 200, description = "Update news entry", body = ApiResponse<News>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_news(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateNewsRequest>,
) -> AppResult<Json<ApiResponse<News>>> {
    let resp = content_service::update_news(&state, &admin, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/news/{id}",
    params(("id" = Uuid, Path, description = "News entry ID")),
    responses(
        (status = 200, description = "Delete news entry"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_news(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = content_service::delete_news(&state, &admin, id).await?;
    Ok(Json(resp))
}
