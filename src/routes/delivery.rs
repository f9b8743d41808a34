use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};

use crate::{
    dto::delivery::{CheckAddressRequest, DeliveryQuote, ZoneList},
    error::AppResult,
    middleware::auth::AdminUser,
    response::ApiResponse,
    services::delivery_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/check", post(check_address))
        .route("/zones", get(list_zones))
}

pub fn admin_router() -> Router<AppState> {
    Router::new().route("/delivery-zones", put(replace_zones))
}

#[utoipa::path(
    post,
    path = "/api/delivery/check",
    request_body = CheckAddressRequest,
    responses(
        (status = 200, description = "Whether the address is served and at what price", body = ApiResponse<DeliveryQuote>),
        (status = 422, description = "Validation failed")
    ),
    tag = "Delivery"
)]
pub async fn check_address(
    State(state): State<AppState>,
    Json(payload): Json<CheckAddressRequest>,
) -> AppResult<Json<ApiResponse<DeliveryQuote>>> {
    let resp = delivery_service::check_address(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/delivery/zones",
    responses(
        (status = 200, description = "Delivery zones ordered by radius", body = ApiResponse<ZoneList>)
    ),
    tag = "Delivery"
)]
pub async fn list_zones(State(state): State<AppState>) -> AppResult<Json<ApiResponse<ZoneList>>> {
    let resp = delivery_service::list_zones(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/delivery-zones",
    request_body = ZoneList,
    responses(
        (status = 200, description = "Zones replaced", body = ApiResponse<ZoneList>),
        (status = 400, description = "Zones overlap or are malformed"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn replace_zones(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<ZoneList>,
) -> AppResult<Json<ApiResponse<ZoneList>>> {
    let resp = delivery_service::replace_zones(&state, &admin, payload).await?;
    Ok(Json(resp))
}
