use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    config::AppConfig,
    geocoding::{Geocoder, GoogleGeocoder},
    mailer::{LogMailer, Mailer, SmtpMailer},
};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub http: reqwest::Client,
    pub geocoder: Arc<dyn Geocoder>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, config: AppConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        let geocoder: Arc<dyn Geocoder> = Arc::new(GoogleGeocoder::new(
            http.clone(),
            config.google_maps_api_key.clone(),
        ));

        let mailer: Arc<dyn Mailer> = match &config.smtp {
            Some(smtp) => Arc::new(SmtpMailer::new(smtp)?),
            None => {
                tracing::warn!("SMTP_HOST or RECIPIENT_EMAIL not set, emails will only be logged");
                Arc::new(LogMailer)
            }
        };

        Ok(Self {
            orm,
            config: Arc::new(config),
            http,
            geocoder,
            mailer,
        })
    }

    pub fn with_geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = geocoder;
        self
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }
}
