use restaurant_ordering_api::{config::AppConfig, db::run_migrations};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    run_migrations(&config.database_url).await?;
    tracing::info!("migrations applied");
    Ok(())
}
