//! # Inventario API
//!
//! REST server entry point.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Inventario API Server                           │
//! │                                                                         │
//! │  Frontend ───► HTTP (8080) ───► axum routes ───► SQLite (WAL)           │
//! │                                      │                                  │
//! │                                      ▼                                  │
//! │                              inventario-core                            │
//! │                           (validation, lot FSM)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use axum::http::HeaderValue;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use inventario_api::config::{ApiConfig, ConfigError};
use inventario_api::routes::build_router;
use inventario_api::AppState;
use inventario_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Inventario API server...");

    // Load configuration
    let config = ApiConfig::load()?;
    info!(
        port = config.http_port,
        db_path = %config.db_path,
        "Configuration loaded"
    );

    // The SQLite file lives in a subdirectory by default; create it so a
    // fresh checkout starts without manual setup.
    if let Some(parent) = std::path::Path::new(&config.db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Connect and migrate
    let db = Database::new(DbConfig::new(&config.db_path)).await?;
    info!("Connected to SQLite, migrations applied");

    let cors_origin = config
        .cors_origin
        .as_deref()
        .map(HeaderValue::from_str)
        .transpose()
        .map_err(|_| ConfigError::InvalidValue("INVENTARIO_CORS_ORIGIN".to_string()))?;

    let state = Arc::new(AppState { db });
    let app = build_router(state, cors_origin);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,inventario_api=debug,inventario_db=debug,sqlx=warn")
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
