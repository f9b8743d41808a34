use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::promo_codes::{
        CreatePromoCodeRequest, MarkPromoCodeUsedRequest, PromoCodeList, PromoValidation,
        UpdatePromoCodeRequest, ValidatePromoCodeRequest,
    },
    error::AppResult,
    middleware::auth::AdminUser,
    models::PromoCode,
    response::ApiResponse,
    routes::params::Pagination,
    services::promo_code_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/validate", post(validate_promo_code))
        .route("/mark-used", post(mark_promo_code_used))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/promo-codes", get(list_promo_codes).post(create_promo_code))
        .route(
            "/promo-codes/{id}",
            get(get_promo_code)
                .put(update_promo_code)
                .delete(delete_promo_code),
        )
}

#[utoipa::path(
    post,
    path = "/api/promo-codes/validate",
    request_body = ValidatePromoCodeRequest,
    responses(
        (status = 200, description = "Promo code can be applied", body = ApiResponse<PromoValidation>),
        (status = 400, description = "Inactive, used, not started or expired"),
        (status = 404, description = "Unknown code")
    ),
    tag = "Promo codes"
)]
pub async fn validate_promo_code(
    State(state): State<AppState>,
    Json(payload): Json<ValidatePromoCodeRequest>,
) -> AppResult<Json<ApiResponse<PromoValidation>>> {
    let resp = promo_code_service::validate_promo_code(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/promo-codes/mark-used",
    request_body = MarkPromoCodeUsedRequest,
    responses(
        (status = 200, description = "One-time code consumed", body = ApiResponse<PromoCode>),
        (status = 400, description = "Already used"),
        (status = 404, description = "Unknown code")
    ),
    tag = "Promo codes"
)]
pub async fn mark_promo_code_used(
    State(state): State<AppState>,
    Json(payload): Json<MarkPromoCodeUsedRequest>,
) -> AppResult<Json<ApiResponse<PromoCode>>> {
    let resp = promo_code_service::mark_promo_code_used(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/promo-codes",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "List promo codes", body = ApiResponse<PromoCodeList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_promo_codes(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<Pagination>,
) -> AppResult<Json<ApiResponse<PromoCodeList>>> {
    let resp = promo_code_service::list_promo_codes(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/promo-codes/{id}",
    params(("id" = Uuid, Path, description = "Promo code ID")),
    responses(
        (status = 200, description = "Promo code", body = ApiResponse<PromoCode>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_promo_code(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PromoCode>>> {
    let resp = promo_code_service::get_promo_code(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/promo-codes",
    request_body = CreatePromoCodeRequest,
    responses(
        (status = 200, description = "Create promo code", body = ApiResponse<PromoCode>),
        (status = 400, description = "Code already exists"),
        (status = 422, description = "Validation failed")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_promo_code(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<CreatePromoCodeRequest>,
) -> AppResult<Json<ApiResponse<PromoCode>>> {
    let resp = promo_code_service::create_promo_code(&state, &admin, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/promo-codes/{id}",
    params(("id" = Uuid, Path, description = "Promo code ID")),
    request_body = UpdatePromoCodeRequest,
    responses(
        (status = 200, description = "Update promo code", body = ApiResponse<PromoCode>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_promo_code(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePromoCodeRequest>,
) -> AppResult<Json<ApiResponse<PromoCode>>> {
    let resp = promo_code_service::update_promo_code(&state, &admin, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/promo-codes/{id}",
    params(("id" = Uuid, Path, description = "Promo code ID")),
    responses(
        (status = 200, description = "Delete promo code"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_promo_code(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = promo_code_service::delete_promo_code(&state, &admin, id).await?;
    Ok(Json(resp))
}
