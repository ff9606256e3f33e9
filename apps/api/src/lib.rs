//! # Inventario API
//!
//! REST backend for the Inventario stock system.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          REST Endpoints                                 │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  /categorias   │  │  /elementos    │  │  /series                   ││
//! │  │                │  │                │  │                            ││
//! │  │ • roots        │  │ • list/detail  │  │ • create                   ││
//! │  │ • jerarquia    │  │ • create       │  │ • list per element         ││
//! │  │ • subcategorias│  │ • update       │  │ • detail/update/delete     ││
//! │  │ • cascade del  │  │ • delete       │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌──────────────────────────────────┐  ┌────────────────┐               │
//! │  │  /lote-movimientos               │  │  /health       │               │
//! │  │                                  │  │                │               │
//! │  │ • cambiar-estado (bucket moves)  │  │ • liveness +   │               │
//! │  │ • historial / distribucion       │  │   db roundtrip │               │
//! │  │ • transiciones (picker)          │  │                │               │
//! │  └──────────────────────────────────┘  └────────────────┘               │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐   │
//! │  │                        Infrastructure                            │   │
//! │  │                                                                  │   │
//! │  │  inventario-core   pure rules: validation, tree, state machine   │   │
//! │  │  inventario-db     SQLite (WAL) repositories and migrations      │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every response wears the same envelope (`{ success, data, count?,
//! error? }`) and the wire field names are Spanish because the frontend
//! contract predates this server; see [`dto`] and [`response`].
//!
//! ## Configuration
//! Environment variables:
//! - `INVENTARIO_HTTP_PORT` - HTTP listen port (default: 8080)
//! - `INVENTARIO_DB_PATH` - SQLite file path (default: data/inventario.db)
//! - `INVENTARIO_CORS_ORIGIN` - allowed browser origin (default: any)

pub mod config;
pub mod dto;
pub mod error;
pub mod response;
pub mod routes;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use response::Envelope;
pub use routes::build_router;

use inventario_db::Database;

/// Shared application state.
pub struct AppState {
    pub db: Database,
}
