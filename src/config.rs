use std::{env, str::FromStr, time::Duration};

use anyhow::Context;
use chrono::FixedOffset;

use crate::domain::Coordinates;

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub recipient: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub cron_secret: Option<String>,
    pub smtp: Option<SmtpConfig>,
    pub google_maps_api_key: Option<String>,
    pub restaurant_origin: Coordinates,
    pub restaurant_offset: FixedOffset,
    pub stale_order_after: chrono::Duration,
    pub stale_sweep_interval: Option<Duration>,
    pub upload_dir: String,
    pub public_base_url: String,
    pub analytics_url: Option<String>,
    pub vercel_api_token: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        let smtp = match (optional("SMTP_HOST"), optional("RECIPIENT_EMAIL")) {
            (Some(host), Some(recipient)) => Some(SmtpConfig {
                host,
                port: parsed("SMTP_PORT")?.unwrap_or(587),
                username: optional("EMAIL_USER").unwrap_or_default(),
                password: optional("EMAIL_PASSWORD").unwrap_or_default(),
                recipient,
            }),
            _ => None,
        };

        let restaurant_origin = Coordinates {
            lat: parsed("RESTAURANT_LAT")?.unwrap_or(52.2297),
            lng: parsed("RESTAURANT_LNG")?.unwrap_or(21.0122),
        };

        let offset_minutes: i32 = parsed("RESTAURANT_UTC_OFFSET_MINUTES")?.unwrap_or(60);
        let restaurant_offset = FixedOffset::east_opt(offset_minutes * 60)
            .context("RESTAURANT_UTC_OFFSET_MINUTES is out of range")?;

        let stale_minutes: i64 = parsed("STALE_ORDER_MINUTES")?.unwrap_or(10);
        let stale_sweep_interval = parsed::<u64>("STALE_SWEEP_INTERVAL_SECS")?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            cron_secret: optional("CRON_SECRET"),
            smtp,
            google_maps_api_key: optional("GOOGLE_MAPS_API_KEY")
                .or_else(|| optional("NEXT_PUBLIC_GOOGLE_MAPS_API_KEY")),
            restaurant_origin,
            restaurant_offset,
            stale_order_after: chrono::Duration::minutes(stale_minutes),
            stale_sweep_interval,
            upload_dir: optional("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string()),
            public_base_url: optional("PUBLIC_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{port}")),
            analytics_url: optional("ANALYTICS_URL"),
            vercel_api_token: optional("VERCEL_API_TOKEN"),
        })
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    optional(key)
        .map(|raw| raw.trim().parse::<T>())
        .transpose()
        .with_context(|| format!("{key} has an invalid value"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_rejects_garbage_and_skips_blank() {
        // SAFETY: the keys are only touched by this test
        unsafe {
            env::set_var("RESTAURANT_TEST_PARSED_OK", " 42 ");
            env::set_var("RESTAURANT_TEST_PARSED_BAD", "forty");
            env::set_var("RESTAURANT_TEST_PARSED_BLANK", "  ");
        }
        assert_eq!(parsed::<u32>("RESTAURANT_TEST_PARSED_OK").unwrap(), Some(42));
        assert!(parsed::<u32>("RESTAURANT_TEST_PARSED_BAD").is_err());
        assert_eq!(parsed::<u32>("RESTAURANT_TEST_PARSED_BLANK").unwrap(), None);
        assert_eq!(parsed::<u32>("RESTAURANT_TEST_PARSED_MISSING").unwrap(), None);
    }
}
