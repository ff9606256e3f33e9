//! Lot movement endpoints: the state machine over the wire.
//!
//! change-state validates the pure rules first (positive quantity, allowed
//! transition pair), then hands the bucket arithmetic to the store, which
//! runs it in one transaction. History, distribution and the transition
//! picker are read-only companions.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use inventario_core::transitions::{allowed_transitions, suggested_reason, validate_movement};
use inventario_core::types::{LotStatus, NewMovement};
use inventario_core::CoreError;
use inventario_db::DbError;

use crate::dto::{
    euros_to_cents, ChangeStateRequest, DistributionDto, MovementDto, TransitionOptionDto,
};
use crate::error::{ApiError, ApiResult};
use crate::response::Envelope;
use crate::AppState;

/// POST /lote-movimientos/cambiar-estado - move units between buckets.
///
/// When `motivo` is absent the suggested reason for the transition pair is
/// recorded instead. Money arrives as euros and is stored as cents.
pub async fn change_state(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChangeStateRequest>, JsonRejection>,
) -> ApiResult<Json<Envelope<MovementDto>>> {
    let Json(req) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    validate_movement(req.cantidad, req.estado_origen, req.estado_destino)?;

    let element = state
        .db
        .elements()
        .get_by_id(&req.elemento_id)
        .await?
        .ok_or_else(|| DbError::not_found("Element", &req.elemento_id))?;
    if element.requires_serials() {
        return Err(CoreError::NotLotTracked(element.id).into());
    }

    let reason = req
        .motivo
        .unwrap_or_else(|| suggested_reason(req.estado_origen, req.estado_destino));
    let movement = state
        .db
        .movements()
        .apply(NewMovement {
            element_id: element.id,
            quantity: req.cantidad,
            from_status: req.estado_origen,
            to_status: req.estado_destino,
            cleaning_status: req.estado_limpieza_destino,
            reason,
            description: req.descripcion,
            repair_cost_cents: req.costo_reparacion.map(euros_to_cents),
        })
        .await?;

    Ok(Json(Envelope::ok(MovementDto::from(movement))))
}

/// GET /lote-movimientos/historial/{elemento_id} - newest first
pub async fn history(
    State(state): State<Arc<AppState>>,
    Path(elemento_id): Path<String>,
) -> ApiResult<Json<Envelope<Vec<MovementDto>>>> {
    let movements = state.db.movements().history(&elemento_id).await?;
    let count = movements.len();
    let data: Vec<MovementDto> = movements.into_iter().map(MovementDto::from).collect();
    Ok(Json(Envelope::ok_list(data, count)))
}

/// GET /lote-movimientos/distribucion/{elemento_id} - current bucket split
pub async fn distribution(
    State(state): State<Arc<AppState>>,
    Path(elemento_id): Path<String>,
) -> ApiResult<Json<Envelope<DistributionDto>>> {
    let element = state
        .db
        .elements()
        .get_by_id(&elemento_id)
        .await?
        .ok_or_else(|| DbError::not_found("Element", &elemento_id))?;
    let buckets = element
        .buckets()
        .ok_or_else(|| CoreError::NotLotTracked(elemento_id))?;
    Ok(Json(Envelope::ok(DistributionDto::from(*buckets))))
}

/// GET /lote-movimientos/transiciones/{estado} - the client's picker.
///
/// Serves the allowed destinations with their suggested reasons; an unknown
/// status in the path is a validation error, not a missing route.
pub async fn transitions(
    estado: Result<Path<LotStatus>, PathRejection>,
) -> ApiResult<Json<Envelope<Vec<TransitionOptionDto>>>> {
    let Path(from) = estado.map_err(|e| ApiError::Validation(e.body_text()))?;
    let options: Vec<TransitionOptionDto> = allowed_transitions(from)
        .iter()
        .map(|&to| TransitionOptionDto {
            destino: to,
            motivo_sugerido: suggested_reason(from, to),
        })
        .collect();
    let count = options.len();
    Ok(Json(Envelope::ok_list(options, count)))
}
