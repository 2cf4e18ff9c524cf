use set_designer::{
    archetype::repository::PostgresArchetypeRepository,
    build_router,
    card::repository::PostgresCardRepository,
    config::{AppConfig, DEFAULT_LOG_FILTER},
    db,
    set::repository::PostgresSetRepository,
    AppState,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.env_file_loaded {
        info!("Loaded environment from .env");
    }
    info!("Starting set designer server");

    // Easy to switch between implementations:
    let app_state = match &config.database_url {
        Some(url) => {
            let pool = db::connect(url).await?;
            AppState::new(
                Arc::new(PostgresSetRepository::new(pool.clone())),
                Arc::new(PostgresCardRepository::new(pool.clone())),
                Arc::new(PostgresArchetypeRepository::new(pool)),
            )
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory storage");
            AppState::in_memory()
        }
    };

    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
