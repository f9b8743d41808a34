pub mod analytics_service;
pub mod auth_service;
pub mod content_service;
pub mod delivery_service;
pub mod menu_service;
pub mod notification_service;
pub mod order_service;
pub mod promo_code_service;
pub mod settings_service;
pub mod upload_service;
