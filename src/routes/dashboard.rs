use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post},
};

use crate::{
    error::AppResult,
    middleware::auth::AdminUser,
    response::ApiResponse,
    services::{
        analytics_service::{self, AnalyticsReport},
        upload_service::{self, MAX_UPLOAD_BYTES, UploadedImage},
    },
    state::AppState,
};

// multipart framing on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/upload",
            post(upload_image).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD)),
        )
        .route("/analytics", get(analytics))
}

#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(content_type = "multipart/form-data", description = "Image in the `file` field"),
    responses(
        (status = 200, description = "Stored image and its public URL", body = ApiResponse<UploadedImage>),
        (status = 400, description = "Missing file, unsupported format or too large"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    admin: AdminUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<UploadedImage>>> {
    let resp = upload_service::upload_image(&state, &admin, multipart).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/analytics",
    responses(
        (status = 200, description = "Visitor analytics", body = ApiResponse<AnalyticsReport>),
        (status = 403, description = "Forbidden"),
        (status = 502, description = "Analytics provider failed")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn analytics(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<AnalyticsReport>>> {
    let resp = analytics_service::fetch_analytics(&state).await?;
    Ok(Json(resp))
}
