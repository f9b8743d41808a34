use chrono::{DateTime, FixedOffset, NaiveTime, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};
use validator::Validate;

use crate::{
    audit,
    domain::{MenuCategory, menu::pizza_window_open},
    dto::settings::UpdateSettingsRequest,
    entity::settings::{ActiveModel as SettingsActive, Entity as SettingsEntity, Model as SettingsModel, SETTINGS_ID},
    error::AppResult,
    middleware::auth::AdminUser,
    models::Settings,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// The settings row, created with defaults if a fresh database lacks it.
pub async fn load_settings<C: ConnectionTrait>(db: &C) -> AppResult<SettingsModel> {
    if let Some(settings) = SettingsEntity::find_by_id(SETTINGS_ID).one(db).await? {
        return Ok(settings);
    }

    tracing::warn!("settings row missing, inserting defaults");
    let settings = SettingsActive {
        id: Set(SETTINGS_ID),
        ordering_open: Set(true),
        order_wait_minutes: Set(45),
        pizza_available_from: Set(None),
        pizza_available_until: Set(None),
        delivery_cost_fallback: Set(None),
        updated_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await?;
    Ok(settings)
}

/// Wall-clock time at the restaurant.
pub fn local_time(offset: FixedOffset, now: DateTime<Utc>) -> NaiveTime {
    now.with_timezone(&offset).time()
}

pub fn is_category_available(settings: &SettingsModel, category: MenuCategory, at: NaiveTime) -> bool {
    match category {
        MenuCategory::Pizza => pizza_window_open(
            settings.pizza_available_from,
            settings.pizza_available_until,
            at,
        ),
        _ => true,
    }
}

pub async fn get_settings(state: &AppState) -> AppResult<ApiResponse<Settings>> {
    let settings = load_settings(&state.orm).await?;
    Ok(ApiResponse::success("Settings", settings.into(), None))
}

pub async fn update_settings(
    state: &AppState,
    AdminUser(user): &AdminUser,
    payload: UpdateSettingsRequest,
) -> AppResult<ApiResponse<Settings>> {
    payload.validate()?;

    let existing = load_settings(&state.orm).await?;
    let mut active: SettingsActive = existing.into();
    if let Some(open) = payload.ordering_open {
        active.ordering_open = Set(open);
    }
    if let Some(minutes) = payload.order_wait_minutes {
        active.order_wait_minutes = Set(minutes);
    }
    if let Some(from) = payload.pizza_available_from {
        active.pizza_available_from = Set(from);
    }
    if let Some(until) = payload.pizza_available_until {
        active.pizza_available_until = Set(until);
    }
    if let Some(fallback) = payload.delivery_cost_fallback {
        active.delivery_cost_fallback = Set(fallback);
    }
    active.updated_at = Set(Utc::now().into());
    let settings = active.update(&state.orm).await?;

    tracing::info!(ordering_open = settings.ordering_open, "settings updated");
    audit::record(
        state,
        Some(user.user_id),
        "settings_update",
        "settings",
        serde_json::json!({ "ordering_open": settings.ordering_open }),
    )
    .await;

    Ok(ApiResponse::success(
        "Settings updated",
        settings.into(),
        Some(Meta::empty()),
    ))
}
