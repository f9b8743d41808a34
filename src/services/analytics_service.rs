use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    response::ApiResponse,
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyticsReport {
    /// `"vercel"` when proxied, `"disabled"` when no provider is configured.
    pub source: String,
    #[schema(value_type = Object)]
    pub data: Value,
}

impl AnalyticsReport {
    fn disabled() -> Self {
        Self {
            source: "disabled".into(),
            data: Value::Object(Default::default()),
        }
    }
}

/// Forwards the admin dashboard request to the hosting provider's analytics
/// API.
pub async fn fetch_analytics(state: &AppState) -> AppResult<ApiResponse<AnalyticsReport>> {
    let (Some(url), Some(token)) = (
        state.config.analytics_url.as_deref(),
        state.config.vercel_api_token.as_deref(),
    ) else {
        return Ok(ApiResponse::success("Analytics disabled", AnalyticsReport::disabled(), None));
    };

    let response = state
        .http
        .get(url)
        .bearer_auth(token)
        .send()
        .await
        .map_err(|err| {
            tracing::warn!(error = %err, "analytics request failed");
            AppError::Upstream("Analytics provider unreachable".into())
        })?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(%status, "analytics provider returned an error");
        return Err(AppError::Upstream(format!("Analytics provider returned {status}")));
    }

    let data = response.json::<Value>().await.map_err(|err| {
        tracing::warn!(error = %err, "analytics response was not json");
        AppError::Upstream("Invalid analytics response".into())
    })?;

    Ok(ApiResponse::success(
        "Analytics",
        AnalyticsReport {
            source: "vercel".into(),
            data,
        },
        None,
    ))
}
