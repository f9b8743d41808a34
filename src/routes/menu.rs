use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    domain::MenuCategory,
    dto::menu::{CreateMenuItemRequest, MenuList, UpdateMenuItemRequest},
    error::AppResult,
    middleware::auth::AdminUser,
    models::MenuItem,
    response::ApiResponse,
    routes::params::MenuQuery,
    services::menu_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_menu))
        .route("/categories", get(list_categories))
        .route("/{id}", get(get_menu_item))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/menu", get(list_all_items).post(create_menu_item))
        .route("/menu/{id}", put(update_menu_item).delete(delete_menu_item))
}

#[utoipa::path(
    get,
    path = "/api/menu",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("category" = Option<MenuCategory>, Query, description = "Filter by category"),
        ("recommended" = Option<bool>, Query, description = "Only recommended items"),
        ("main_page" = Option<bool>, Query, description = "Only items shown on the main page"),
        ("q" = Option<String>, Query, description = "Search in name and description"),
    ),
    responses(
        (status = 200, description = "Active menu items", body = ApiResponse<MenuList>)
    ),
    tag = "Menu"
)]
pub async fn list_menu(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<ApiResponse<MenuList>>> {
    let resp = menu_service::list_menu(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/menu/categories",
    responses(
        (status = 200, description = "Menu categories", body = ApiResponse<Vec<MenuCategory>>)
    ),
    tag = "Menu"
)]
pub async fn list_categories() -> Json<ApiResponse<Vec<MenuCategory>>> {
    Json(menu_service::categories())
}

#[utoipa::path(
    get,
    path = "/api/menu/{id}",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Menu item", body = ApiResponse<MenuItem>),
        (status = 404, description = "Menu item not found"),
    ),
    tag = "Menu"
)]
pub async fn get_menu_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let resp = menu_service::get_menu_item(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/menu",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("category" = Option<MenuCategory>, Query, description = "Filter by category"),
        ("q" = Option<String>, Query, description = "Search in name and description"),
    ),
    responses(
        (status = 200, description = "All menu items including inactive", body = ApiResponse<MenuList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_items(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<ApiResponse<MenuList>>> {
    let resp = menu_service::list_all_items(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/menu",
    request_body = CreateMenuItemRequest,
    responses(
        (status = 200, description = "Create menu item", body = ApiResponse<MenuItem>),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Validation failed")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_menu_item(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<CreateMenuItemRequest>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let resp = menu_service::create_menu_item(&state, &admin, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/menu/{id}",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    request_body = UpdateMenuItemRequest,
    responses(
        (status = 200, description = "Update menu item", body = ApiResponse<MenuItem>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_menu_item(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMenuItemRequest>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let resp = menu_service::update_menu_item(&state, &admin, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/menu/{id}",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Delete menu item"),
        (status = 400, description = "Menu item is referenced by orders"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = menu_service::delete_menu_item(&state, &admin, id).await?;
    Ok(Json(resp))
}
