use axum::{
    Json, Router,
    extract::State,
    routing::{get, put},
};

use crate::{
    dto::settings::UpdateSettingsRequest,
    error::AppResult,
    middleware::auth::AdminUser,
    models::Settings,
    response::ApiResponse,
    services::settings_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_settings))
}

pub fn admin_router() -> Router<AppState> {
    Router::new().route("/settings", put(update_settings))
}

#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "Restaurant settings", body = ApiResponse<Settings>)
    ),
    tag = "Settings"
)]
pub async fn get_settings(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Settings>>> {
    let resp = settings_service::get_settings(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = ApiResponse<Settings>),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Validation failed")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_settings(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<UpdateSettingsRequest>,
) -> AppResult<Json<ApiResponse<Settings>>> {
    let resp = settings_service::update_settings(&state, &admin, payload).await?;
    Ok(Json(resp))
}
