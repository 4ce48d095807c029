//! Database migration runner.

use sqlx::PgPool;
use tracing::info;

use betterqr_core::error::{AppError, ErrorKind};
use betterqr_core::logging::DB;

/// Run all pending database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!(target: DB, "Running database migrations");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!(target: DB, "Database migrations completed");
    Ok(())
}
