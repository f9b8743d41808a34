#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use chrono::{FixedOffset, Utc};
use restaurant_ordering_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    domain::{Coordinates, MenuCategory},
    entity::{
        menu_items::ActiveModel as MenuItemActive,
        settings::{ActiveModel as SettingsActive, SETTINGS_ID},
        users::ActiveModel as UserActive,
    },
    geocoding::{GeocodeError, Geocoder},
    mailer::{MailError, Mailer},
    middleware::auth::{AdminUser, AuthUser, ROLE_ADMIN},
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, Set, Statement};
use uuid::Uuid;

pub const ORIGIN: Coordinates = Coordinates {
    lat: 52.2297,
    lng: 21.0122,
};

pub fn database_url() -> Option<String> {
    match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run database tests.");
            None
        }
    }
}

pub fn test_config(database_url: &str) -> AppConfig {
    AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "test-secret".into(),
        cron_secret: Some("cron-secret".into()),
        smtp: None,
        google_maps_api_key: None,
        restaurant_origin: ORIGIN,
        restaurant_offset: FixedOffset::east_opt(3600).unwrap(),
        stale_order_after: chrono::Duration::minutes(10),
        stale_sweep_interval: None,
        upload_dir: std::env::temp_dir().join("restaurant-uploads").display().to_string(),
        public_base_url: "http://localhost:3000".into(),
        analytics_url: None,
        vercel_api_token: None,
    }
}

/// State over a connection that never reaches a database.
pub fn offline_state() -> AppState {
    AppState::new(DatabaseConnection::Disconnected, test_config("postgres://offline"))
        .expect("offline state")
}

/// Migrated, emptied database with ordering open and no pizza window.
pub async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    run_migrations(database_url).await?;
    let orm = create_orm_conn(database_url).await?;

    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_items, orders, promo_codes, menu_items, delivery_zones, audit_logs RESTART IDENTITY CASCADE",
    ))
    .await?;

    SettingsActive {
        id: Set(SETTINGS_ID),
        ordering_open: Set(true),
        order_wait_minutes: Set(45),
        pizza_available_from: Set(None),
        pizza_available_until: Set(None),
        delivery_cost_fallback: Set(None),
        updated_at: Set(Utc::now().into()),
    }
    .update(&orm)
    .await?;

    let state = AppState::new(orm, test_config(database_url))?;
    Ok(state)
}

pub async fn insert_menu_item(
    state: &AppState,
    name: &str,
    category: MenuCategory,
    price: i64,
) -> anyhow::Result<Uuid> {
    let now = Utc::now();
    let item = MenuItemActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        price: Set(price),
        description: Set(None),
        category: Set(category),
        image_url: Set(None),
        is_orderable: Set(true),
        is_active: Set(true),
        is_recommended: Set(false),
        is_on_main_page: Set(false),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(item.id)
}

/// Inserts a panel account and returns it as the extractors would.
pub async fn create_user(state: &AppState, role: &str) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(format!("{role}-{}@example.com", Uuid::new_v4())),
        password_hash: Set("dummy".into()),
        role: Set(role.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        role: user.role,
    })
}

pub async fn create_admin(state: &AppState) -> anyhow::Result<AdminUser> {
    Ok(AdminUser(create_user(state, ROLE_ADMIN).await?))
}

/// Answers every lookup with the same coordinates.
pub struct FixedGeocoder(pub Option<Coordinates>);

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        Ok(self.0)
    }
}

pub struct FailingGeocoder;

#[async_trait]
impl Geocoder for FailingGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        Err(GeocodeError::Provider("OVER_QUERY_LIMIT".into()))
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail: AtomicBool,
}

impl RecordingMailer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn subjects(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(subject, _)| subject.clone())
            .collect()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, subject: &str, body: &str) -> Result<(), MailError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailError::Build(lettre::error::Error::MissingFrom));
        }
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        Ok(())
    }
}
