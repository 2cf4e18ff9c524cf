use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::shared::AppError;

/// Opens a connection pool and applies pending migrations
pub async fn connect(database_url: &str) -> Result<PgPool, AppError> {
    info!("Connecting to PostgreSQL");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to connect to database");
            AppError::DatabaseError(e.to_string())
        })?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to run migrations");
            AppError::DatabaseError(e.to_string())
        })?;

    info!("Database ready");
    Ok(pool)
}

/// Counts are stored as INTEGER columns
pub(crate) fn count_to_db(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

pub(crate) fn count_from_db(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}
