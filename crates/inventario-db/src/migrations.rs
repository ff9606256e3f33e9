//! # Database Migrations
//!
//! Schema migrations embedded at compile time. The SQL files live in
//! `migrations/sqlite/` at the workspace root and are baked into the binary,
//! so deployments never depend on loose files on disk.
//!
//! Migrations are tracked in the `_sqlx_migrations` table and each file runs
//! at most once, in filename order.

use crate::error::DbResult;
use sqlx::migrate::Migrator;
use sqlx::SqlitePool;
use tracing::info;

/// Embedded migrations from the workspace migrations directory
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Run all pending migrations
///
/// Safe to call on every startup: already-applied migrations are skipped.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Running database migrations...");
    MIGRATOR.run(pool).await?;
    info!("Migrations completed successfully");
    Ok(())
}

/// List applied migrations (version and description), oldest first
pub async fn migration_status(pool: &SqlitePool) -> DbResult<Vec<(i64, String)>> {
    let rows: Vec<(i64, String)> = sqlx::query_as(
        "SELECT version, description FROM _sqlx_migrations ORDER BY version",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
