//! Route table and shared handler plumbing.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                            REST surface                              │
//! │                                                                      │
//! │  GET    /health                                  liveness + db ping  │
//! │  GET    /categorias                              root categories     │
//! │  GET    /categorias/jerarquia                    full tree           │
//! │  GET    /categorias/{id}/subcategorias           direct children     │
//! │  POST   /categorias                              create              │
//! │  DELETE /categorias/{id}                         cascading delete    │
//! │  GET    /elementos                               list                │
//! │  GET    /elementos/{id}                          detail + series     │
//! │  POST   /elementos                               create              │
//! │  PUT    /elementos/{id}                          partial update      │
//! │  DELETE /elementos/{id}                          delete              │
//! │  POST   /series                                  create              │
//! │  GET    /series/elemento/{elemento_id}           serials of element  │
//! │  GET    /series/{id}                             detail              │
//! │  PUT    /series/{id}                             partial update      │
//! │  DELETE /series/{id}                             delete              │
//! │  POST   /lote-movimientos/cambiar-estado         apply transition    │
//! │  GET    /lote-movimientos/historial/{id}         history, newest 1st │
//! │  GET    /lote-movimientos/distribucion/{id}      bucket split        │
//! │  GET    /lote-movimientos/transiciones/{estado}  allowed + suggested │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers are deliberately thin: decode, validate with inventario-core,
//! delegate to a repository, wrap in the envelope. Unknown routes and
//! malformed JSON answer the same failure envelope as domain errors.

pub mod categories;
pub mod elements;
pub mod movements;
pub mod serials;

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderValue;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::error::{ApiError, ApiResult};
use crate::response::Envelope;
use crate::AppState;

/// Build the full application router.
///
/// `cors_origin` restricts browsers to one origin; `None` is permissive
/// (development default).
pub fn build_router(state: Arc<AppState>, cors_origin: Option<HeaderValue>) -> Router {
    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::permissive(),
    };

    Router::new()
        .route("/health", get(health))
        .route(
            "/categorias",
            get(categories::list_roots).post(categories::create),
        )
        .route("/categorias/jerarquia", get(categories::tree))
        .route("/categorias/{id}/subcategorias", get(categories::children))
        .route("/categorias/{id}", delete(categories::remove))
        .route("/elementos", get(elements::list).post(elements::create))
        .route(
            "/elementos/{id}",
            get(elements::detail)
                .put(elements::update)
                .delete(elements::remove),
        )
        .route("/series", post(serials::create))
        .route(
            "/series/elemento/{elemento_id}",
            get(serials::list_for_element),
        )
        .route(
            "/series/{id}",
            get(serials::detail)
                .put(serials::update)
                .delete(serials::remove),
        )
        .route(
            "/lote-movimientos/cambiar-estado",
            post(movements::change_state),
        )
        .route(
            "/lote-movimientos/historial/{elemento_id}",
            get(movements::history),
        )
        .route(
            "/lote-movimientos/distribucion/{elemento_id}",
            get(movements::distribution),
        )
        .route(
            "/lote-movimientos/transiciones/{estado}",
            get(movements::transitions),
        )
        .fallback(not_found)
        .layer(cors)
        .with_state(state)
}

/// Liveness probe with a database round-trip
async fn health(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Envelope<serde_json::Value>>> {
    state.db.health_check().await?;
    Ok(Json(Envelope::ok(serde_json::json!({ "status": "ok" }))))
}

/// Unknown routes answer the failure envelope, not axum's bare 404
async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

// =============================================================================
// Test Harness
// =============================================================================
