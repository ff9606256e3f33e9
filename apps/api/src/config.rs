//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults, so a bare `cargo run` starts a working dev server.
//!
//! | Variable                  | Default               |
//! |---------------------------|-----------------------|
//! | `INVENTARIO_HTTP_PORT`    | `8080`                |
//! | `INVENTARIO_DB_PATH`      | `data/inventario.db`  |
//! | `INVENTARIO_CORS_ORIGIN`  | unset (allow any)     |

use std::env;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// SQLite database file path
    pub db_path: String,

    /// Allowed CORS origin. Unset means permissive (development).
    pub cors_origin: Option<String>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(ApiConfig {
            http_port: env::var("INVENTARIO_HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("INVENTARIO_HTTP_PORT".to_string()))?,

            db_path: env::var("INVENTARIO_DB_PATH")
                .unwrap_or_else(|_| "data/inventario.db".to_string()),

            cors_origin: env::var("INVENTARIO_CORS_ORIGIN").ok(),
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
