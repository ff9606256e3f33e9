//! # inventario-db: Database Layer
//!
//! SQLite persistence for the inventory system, built on sqlx.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        inventario-db                            │
//! │                                                                 │
//! │  ┌─────────────┐   ┌──────────────┐   ┌─────────────────────┐   │
//! │  │    pool     │   │  migrations  │   │     repository      │   │
//! │  │             │   │              │   │                     │   │
//! │  │ DbConfig    │   │ embedded SQL │   │ CategoryRepository  │   │
//! │  │ Database    │──▶│ MIGRATOR     │   │ ElementRepository   │   │
//! │  │ (SqlitePool)│   │              │   │ SerialRepository    │   │
//! │  └─────────────┘   └──────────────┘   │ MovementRepository  │   │
//! │                                       └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use inventario_db::{Database, DbConfig};
//! use inventario_core::types::Category;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(DbConfig::new("data/inventario.db")).await?;
//!
//!     let category = Category::new("Iluminación", None);
//!     db.categories().insert(&category).await?;
//!
//!     let roots = db.categories().list_roots().await?;
//!     println!("{} root categories", roots.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Guarantees
//!
//! - Migrations run on startup; the schema is always current
//! - Foreign keys are enforced (SQLite leaves them off by default)
//! - Multi-row operations (cascade delete, movements, serial CRUD) are
//!   transactional: they happen entirely or not at all

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// Re-export commonly used types
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::{
    CategoryRepository, ElementChanges, ElementRepository, MovementRepository, SerialRepository,
};
