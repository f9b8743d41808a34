use axum::{Json, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct HealthData {
    pub status: String,
    pub database: String,
}

impl HealthData {
    pub fn new(database_up: bool) -> Self {
        Self {
            status: "ok".to_string(),
            database: if database_up { "up" } else { "down" }.to_string(),
        }
    }
}

/// `status` is always `ok` while the process serves requests; `database`
/// carries the result of a ping.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "OK", body = ApiResponse<HealthData>),
    ),
    tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthData>> {
    let database_up = match state.orm.ping().await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "database ping failed");
            false
        }
    };

    Json(ApiResponse::success(
        "Health check",
        HealthData::new(database_up),
        Some(Meta::empty()),
    ))
}
