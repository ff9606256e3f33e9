//! # Database Connection Pool
//!
//! Connection management for SQLite. A single [`Database`] instance owns the
//! pool and hands out repository views that clone it (pool clones are cheap,
//! they share the same underlying connections).
//!
//! ## Configuration
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        SQLite setup                         │
//! │                                                             │
//! │  journal_mode = WAL    readers never block the writer       │
//! │  synchronous  = NORMAL safe with WAL, much faster           │
//! │  foreign_keys = ON     enforce references (off by default!) │
//! │  create_if_missing     first run creates the file           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Migrations run automatically when the pool is created, so callers get a
//! ready-to-use schema.

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::{
    CategoryRepository, ElementRepository, MovementRepository, SerialRepository,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or ":memory:" for tests
    pub path: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// How long to wait for a free connection before giving up
    pub connection_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: "data/inventario.db".to_string(),
            max_connections: 5,
            connection_timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Create a config pointing at the given database file
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// In-memory database for tests.
    ///
    /// Limited to a single connection: every pooled connection to
    /// ":memory:" would otherwise get its own private database.
    pub fn in_memory() -> Self {
        Self {
            path: ":memory:".to_string(),
            max_connections: 1,
            connection_timeout: Duration::from_secs(5),
        }
    }

    /// Set the maximum number of connections
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// Main database handle owning the connection pool
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect, configure SQLite and run pending migrations
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let options = if config.path == ":memory:" {
            SqliteConnectOptions::from_str("sqlite::memory:")
        } else {
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", config.path))
        }
        .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .foreign_keys(true)
        .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connection_timeout)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(path = %config.path, "Database connection established");

        migrations::run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    /// Raw pool access for custom queries
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Category repository
    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    /// Element repository
    pub fn elements(&self) -> ElementRepository {
        ElementRepository::new(self.pool.clone())
    }

    /// Serial repository
    pub fn serials(&self) -> SerialRepository {
        SerialRepository::new(self.pool.clone())
    }

    /// Lot movement repository
    pub fn movements(&self) -> MovementRepository {
        MovementRepository::new(self.pool.clone())
    }

    /// Cheap connectivity probe for health endpoints
    pub async fn health_check(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close all connections gracefully
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn test_migrations_applied() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let status = migrations::migration_status(db.pool()).await.unwrap();
        assert!(!status.is_empty());
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        // Insert an element pointing at a category that does not exist;
        // with foreign_keys = ON this must fail.
        let result = sqlx::query(
            r#"
            INSERT INTO elements (id, name, category_id, quantity, requires_serials,
                                  status, cleaning_status, created_at, updated_at)
            VALUES ('e1', 'Ghost', 'no-such-category', 1, 0,
                    'new', 'CLEAN', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')
            "#,
        )
        .execute(db.pool())
        .await;
        assert!(result.is_err());
    }
}
