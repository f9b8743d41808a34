use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod content;
pub mod dashboard;
pub mod delivery;
pub mod doc;
pub mod health;
pub mod menu;
pub mod orders;
pub mod params;
pub mod promo_codes;
pub mod settings;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/menu", menu::router())
        .nest("/orders", orders::router())
        .nest("/promo-codes", promo_codes::router())
        .nest("/delivery", delivery::router())
        .nest("/settings", settings::router())
        .nest("/content", content::router())
        .nest("/admin", admin::router())
        .merge(dashboard::router())
}
