use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use common::{
    cache::{RedisConfig, RedisPool},
    database::{self, DatabaseConfig},
};
use hub::{AppState, MIGRATOR, config::HubConfig, routes, seed};

#[tokio::main]
async fn main() -> Result<()> {
    let config = HubConfig::load().context("Failed to load hub configuration")?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("Starting Resume Hub");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool, &MIGRATOR).await?;

    // Initialize Redis client for sessions
    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;
    if !redis_pool.health_check().await.unwrap_or(false) {
        warn!("Redis is not reachable yet; logins will fail until it is");
    }

    tokio::fs::create_dir_all(&config.media_root)
        .await
        .with_context(|| format!("Failed to create media root {}", config.media_root.display()))?;

    let bind_address = config.bind_address.clone();
    let app_state = AppState::new(pool, redis_pool, config);

    let report = seed::seed_default_accounts(
        &app_state.user_repository,
        &app_state.profile_repository,
        &app_state.config.seed_password,
    )
    .await;
    info!(
        "Default accounts: {} created, {} existing, {} failed",
        report.created.len(),
        report.existing.len(),
        report.failed.len()
    );

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Resume Hub listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down Resume Hub");
        })
        .await?;

    Ok(())
}
