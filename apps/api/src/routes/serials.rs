//! Serial endpoints: per-unit CRUD for serial-tracked elements.
//!
//! The owning element's `cantidad` mirrors its serial count; the repository
//! keeps the two in step inside one transaction, so these handlers only
//! validate and pick status codes.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use inventario_core::types::Serial;
use inventario_core::validation::validate_serial_number;
use inventario_db::DbError;

use crate::dto::{CreateSerialRequest, DeletedDto, SerialDto, UpdateSerialRequest};
use crate::error::{ApiError, ApiResult};
use crate::response::Envelope;
use crate::AppState;

/// POST /series - register one more physical unit.
///
/// The target element must exist (404) and be serial-tracked (400); a
/// duplicate serial number anywhere in the system is a 409.
pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateSerialRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<SerialDto>>)> {
    let Json(req) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;

    let element = state
        .db
        .elements()
        .get_by_id(&req.elemento_id)
        .await?
        .ok_or_else(|| DbError::not_found("Element", &req.elemento_id))?;
    if !element.requires_serials() {
        return Err(ApiError::Validation(format!(
            "Element {} is not serial-tracked",
            element.id
        )));
    }

    let number = validate_serial_number(&req.numero_serie)?;
    let serial = Serial::new(
        element.id,
        number,
        req.estado.unwrap_or_default(),
        req.ubicacion,
    );
    state.db.serials().insert(&serial).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(SerialDto::from(serial))),
    ))
}

/// GET /series/elemento/{elemento_id} - all serials of one element
pub async fn list_for_element(
    State(state): State<Arc<AppState>>,
    Path(elemento_id): Path<String>,
) -> ApiResult<Json<Envelope<Vec<SerialDto>>>> {
    if state
        .db
        .elements()
        .get_by_id(&elemento_id)
        .await?
        .is_none()
    {
        return Err(DbError::not_found("Element", &elemento_id).into());
    }

    let serials = state.db.serials().list_for_element(&elemento_id).await?;
    let count = serials.len();
    let data: Vec<SerialDto> = serials.into_iter().map(SerialDto::from).collect();
    Ok(Json(Envelope::ok_list(data, count)))
}

/// GET /series/{id}
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<SerialDto>>> {
    let serial = state
        .db
        .serials()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| DbError::not_found("Serial", &id))?;
    Ok(Json(Envelope::ok(SerialDto::from(serial))))
}

/// PUT /series/{id} - merge number, status and location.
///
/// The owning element and intake date never change.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateSerialRequest>, JsonRejection>,
) -> ApiResult<Json<Envelope<SerialDto>>> {
    let Json(req) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let mut serial = state
        .db
        .serials()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| DbError::not_found("Serial", &id))?;

    if let Some(numero_serie) = &req.numero_serie {
        serial.serial_number = validate_serial_number(numero_serie)?;
    }
    if let Some(estado) = req.estado {
        serial.status = estado;
    }
    if let Some(ubicacion) = req.ubicacion {
        serial.location = Some(ubicacion);
    }

    state.db.serials().update(&serial).await?;
    Ok(Json(Envelope::ok(SerialDto::from(serial))))
}

/// DELETE /series/{id} - drops the unit and the element's count with it
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<DeletedDto>>> {
    state.db.serials().delete(&id).await?;
    Ok(Json(Envelope::ok(DeletedDto { id })))
}
