//! Element endpoints: CRUD over both tracking models.
//!
//! Creation decides the tracking model once, from `requiere_series`:
//! serial-tracked elements must arrive with exactly `cantidad` serial
//! entries, lot-tracked ones start with everything Available. Updates
//! merge field by field and never change the model.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use inventario_core::types::{Element, ElementKind, Serial};
use inventario_core::validation::{
    validate_initial_quantity, validate_name, validate_serial_count, validate_serial_number,
};
use inventario_core::ValidationError;
use inventario_db::{DbError, ElementChanges};

use crate::dto::{
    CreateElementRequest, DeletedDto, ElementDetailDto, ElementDto, SerialDto,
    UpdateElementRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::response::Envelope;
use crate::AppState;

/// GET /elementos - all elements, ordered by name
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Envelope<Vec<ElementDto>>>> {
    let elements = state.db.elements().list().await?;
    let count = elements.len();
    let data: Vec<ElementDto> = elements.into_iter().map(ElementDto::from).collect();
    Ok(Json(Envelope::ok_list(data, count)))
}

/// GET /elementos/{id} - element plus its serial list (empty for lots)
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<ElementDetailDto>>> {
    let element = state
        .db
        .elements()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| DbError::not_found("Element", &id))?;

    let series = if element.requires_serials() {
        state
            .db
            .serials()
            .list_for_element(&element.id)
            .await?
            .into_iter()
            .map(SerialDto::from)
            .collect()
    } else {
        Vec::new()
    };

    Ok(Json(Envelope::ok(ElementDetailDto {
        element: ElementDto::from(element),
        series,
    })))
}

/// POST /elementos - create either tracking model.
///
/// Serial-tracked: the body must carry exactly `cantidad` serial entries,
/// inserted atomically with the element. Lot-tracked: any serial entries
/// are ignored and the whole quantity starts in the Available bucket.
pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateElementRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<ElementDto>>)> {
    let Json(req) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let name = validate_name(&req.nombre)?;
    validate_initial_quantity(req.cantidad)?;

    if let Some(category_id) = &req.categoria_id {
        if state.db.categories().get_by_id(category_id).await?.is_none() {
            return Err(DbError::not_found("Category", category_id).into());
        }
    }

    let (element, serials) = if req.requiere_series {
        let entries = req.series.unwrap_or_default();
        validate_serial_count(req.cantidad, entries.len())?;

        let element = Element::new_serial_tracked(
            name,
            req.descripcion,
            req.categoria_id,
            req.cantidad,
            req.estado.unwrap_or_default(),
        );
        let mut serials = Vec::with_capacity(entries.len());
        for entry in entries {
            let number = validate_serial_number(&entry.numero_serie)?;
            serials.push(Serial::new(
                &element.id,
                number,
                entry.estado.unwrap_or_default(),
                entry.ubicacion,
            ));
        }
        (element, serials)
    } else {
        let element = Element::new_lot(
            name,
            req.descripcion,
            req.categoria_id,
            req.cantidad,
            req.ubicacion,
        );
        (element, Vec::new())
    };

    state.db.elements().insert(&element, &serials).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(ElementDto::from(element))),
    ))
}

/// PUT /elementos/{id} - field-by-field merge.
///
/// The tracking model is immutable, and so is `cantidad` for serial-tracked
/// elements because it mirrors the serial count. For lots a new `cantidad`
/// re-bases the total: the delta lands in the Available bucket, which must
/// not go negative. The write itself is a change set, applied relatively,
/// so a movement committing after the read here keeps its buckets.
/// Kind-specific fields of the other model are ignored, not rejected,
/// because clients send full forms back.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateElementRequest>, JsonRejection>,
) -> ApiResult<Json<Envelope<ElementDto>>> {
    let Json(req) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let element = state
        .db
        .elements()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| DbError::not_found("Element", &id))?;

    if req.requiere_series.is_some() {
        return Err(ValidationError::Immutable {
            field: "requiere_series".to_string(),
        }
        .into());
    }

    let mut changes = ElementChanges::default();
    if let Some(nombre) = &req.nombre {
        changes.name = Some(validate_name(nombre)?);
    }
    changes.description = req.descripcion;
    if let Some(categoria_id) = &req.categoria_id {
        if state
            .db
            .categories()
            .get_by_id(categoria_id)
            .await?
            .is_none()
        {
            return Err(DbError::not_found("Category", categoria_id).into());
        }
    }
    changes.category_id = req.categoria_id;

    match &element.kind {
        ElementKind::SerialTracked { .. } => {
            if req.cantidad.is_some() {
                return Err(ValidationError::Immutable {
                    field: "cantidad".to_string(),
                }
                .into());
            }
            changes.status = req.estado;
        }
        ElementKind::LotTracked { .. } => {
            changes.location = req.ubicacion;
            changes.cleaning_status = req.estado_limpieza;
            if let Some(cantidad) = req.cantidad {
                validate_initial_quantity(cantidad)?;
                changes.quantity_delta = cantidad - element.quantity;
            }
        }
    }

    state.db.elements().update(&id, &changes).await?;

    // Re-read so the response shows the committed row, delta applied.
    let updated = state
        .db
        .elements()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| DbError::not_found("Element", &id))?;
    Ok(Json(Envelope::ok(ElementDto::from(updated))))
}

/// DELETE /elementos/{id} - serials and movement history cascade with it
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<DeletedDto>>> {
    state.db.elements().delete(&id).await?;
    Ok(Json(Envelope::ok(DeletedDto { id })))
}

#[cfg(test)]
mod tests {
    use crate::routes::testing::{request, test_app};
    use axum::http::{Method, StatusCode};
    use axum::Router;
    use serde_json::json;

    async fn create_lot(app: &Router, nombre: &str, cantidad: i64) -> serde_json::Value {
        let (status, body) = request(
            app,
            Method::POST,
            "/elementos",
            Some(json!({ "nombre": nombre, "cantidad": cantidad, "ubicacion": "A1" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"].clone()
    }

    async fn create_serial_element(
        app: &Router,
        nombre: &str,
        serials: &[&str],
    ) -> serde_json::Value {
        let series: Vec<_> = serials
            .iter()
            .map(|s| json!({ "numero_serie": s }))
            .collect();
        let (status, body) = request(
            app,
            Method::POST,
            "/elementos",
            Some(json!({
                "nombre": nombre,
                "cantidad": serials.len(),
                "requiere_series": true,
                "series": series
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"].clone()
    }

    #[tokio::test]
    async fn test_create_lot_element() {
        let app = test_app().await;
        let (status, body) = request(
            &app,
            Method::POST,
            "/elementos",
            Some(json!({
                "nombre": "Sillas plegables",
                "descripcion": "Sillas blancas de resina",
                "cantidad": 25,
                "ubicacion": "Almacén 2"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let data = &body["data"];
        assert_eq!(data["nombre"], "Sillas plegables");
        assert_eq!(data["requiere_series"], false);
        assert_eq!(data["cantidad"], 25);
        assert_eq!(data["cantidad_disponible"], 25);
        assert_eq!(data["cantidad_alquilada"], 0);
        assert_eq!(data["estado_limpieza"], "CLEAN");
        assert_eq!(data["estado_dominante"], "AVAILABLE");
        assert_eq!(data["ubicacion"], "Almacén 2");
    }

    #[tokio::test]
    async fn test_create_serial_element_and_detail() {
        let app = test_app().await;
        let created = create_serial_element(&app, "Proyector 4K", &["PRJ-001", "PRJ-002"]).await;
        assert_eq!(created["requiere_series"], true);
        assert_eq!(created["cantidad"], 2);
        assert_eq!(created["estado"], "new");

        let path = format!("/elementos/{}", created["id"].as_str().unwrap());
        let (status, body) = request(&app, Method::GET, &path, None).await;
        assert_eq!(status, StatusCode::OK);

        let series = body["data"]["series"].as_array().unwrap();
        assert_eq!(series.len(), 2);
        let numbers: Vec<&str> = series
            .iter()
            .map(|s| s["numero_serie"].as_str().unwrap())
            .collect();
        assert!(numbers.contains(&"PRJ-001"));
        assert!(numbers.contains(&"PRJ-002"));
    }

    #[tokio::test]
    async fn test_create_serial_count_mismatch() {
        let app = test_app().await;
        let (status, body) = request(
            &app,
            Method::POST,
            "/elementos",
            Some(json!({
                "nombre": "Micrófono",
                "cantidad": 3,
                "requiere_series": true,
                "series": [{ "numero_serie": "MIC-1" }]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Expected 3 serial entries to match cantidad, got 1"
        );

        // Nothing persisted.
        let (_, body) = request(&app, Method::GET, "/elementos", None).await;
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_create_duplicate_serial_rolls_back() {
        let app = test_app().await;
        let (status, _) = request(
            &app,
            Method::POST,
            "/elementos",
            Some(json!({
                "nombre": "Altavoz",
                "cantidad": 2,
                "requiere_series": true,
                "series": [{ "numero_serie": "SPK-1" }, { "numero_serie": "SPK-1" }]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, body) = request(&app, Method::GET, "/elementos", None).await;
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_create_negative_quantity() {
        let app = test_app().await;
        let (status, body) = request(
            &app,
            Method::POST,
            "/elementos",
            Some(json!({ "nombre": "Mesa", "cantidad": -1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "cantidad must be zero or positive");
    }

    #[tokio::test]
    async fn test_create_with_missing_category() {
        let app = test_app().await;
        let (status, _) = request(
            &app,
            Method::POST,
            "/elementos",
            Some(json!({ "nombre": "Mesa", "cantidad": 4, "categoria_id": "ghost" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_lot_creation_ignores_series() {
        let app = test_app().await;
        let (status, body) = request(
            &app,
            Method::POST,
            "/elementos",
            Some(json!({
                "nombre": "Mantel",
                "cantidad": 5,
                "series": [{ "numero_serie": "IGNORED" }]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["requiere_series"], false);

        let path = format!("/elementos/{}", body["data"]["id"].as_str().unwrap());
        let (_, body) = request(&app, Method::GET, &path, None).await;
        assert_eq!(body["data"]["series"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_detail_missing_element() {
        let app = test_app().await;
        let (status, body) = request(&app, Method::GET, "/elementos/ghost", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let app = test_app().await;
        let created = create_lot(&app, "Silla", 10).await;

        let path = format!("/elementos/{}", created["id"].as_str().unwrap());
        let (status, body) = request(
            &app,
            Method::PUT,
            &path,
            Some(json!({ "nombre": "Silla plegable", "estado_limpieza": "DIRTY" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let data = &body["data"];
        assert_eq!(data["nombre"], "Silla plegable");
        assert_eq!(data["estado_limpieza"], "DIRTY");
        // Untouched fields survive the merge.
        assert_eq!(data["cantidad"], 10);
        assert_eq!(data["ubicacion"], "A1");
    }

    #[tokio::test]
    async fn test_update_serial_element_status() {
        let app = test_app().await;
        let created = create_serial_element(&app, "Cámara", &["CAM-1"]).await;

        let path = format!("/elementos/{}", created["id"].as_str().unwrap());
        let (status, body) = request(
            &app,
            Method::PUT,
            &path,
            Some(json!({ "estado": "maintenance" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["estado"], "maintenance");
    }

    #[tokio::test]
    async fn test_update_rebases_lot_quantity() {
        let app = test_app().await;
        let created = create_lot(&app, "Copas", 10).await;
        let id = created["id"].as_str().unwrap().to_string();
        let path = format!("/elementos/{id}");

        // Grow to 15: the 5 new units land in Available.
        let (status, body) =
            request(&app, Method::PUT, &path, Some(json!({ "cantidad": 15 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["cantidad"], 15);
        assert_eq!(body["data"]["cantidad_disponible"], 15);

        // Rent out 8 so Available drops to 7.
        let (status, _) = request(
            &app,
            Method::POST,
            "/lote-movimientos/cambiar-estado",
            Some(json!({
                "elemento_id": id,
                "cantidad": 8,
                "estado_origen": "AVAILABLE",
                "estado_destino": "RENTED",
                "estado_limpieza_destino": "CLEAN"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        // Shrink to 12: removes 3 from Available, Rented untouched.
        let (status, body) =
            request(&app, Method::PUT, &path, Some(json!({ "cantidad": 12 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["cantidad"], 12);
        assert_eq!(body["data"]["cantidad_disponible"], 4);
        assert_eq!(body["data"]["cantidad_alquilada"], 8);

        // Shrinking to 5 would need 7 units out of Available but only 4 remain.
        let (status, body) =
            request(&app, Method::PUT, &path, Some(json!({ "cantidad": 5 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Insufficient quantity in Available: available 4, requested 7"
        );
    }

    #[tokio::test]
    async fn test_update_tracking_model_is_immutable() {
        let app = test_app().await;
        let created = create_lot(&app, "Silla", 10).await;

        let path = format!("/elementos/{}", created["id"].as_str().unwrap());
        let (status, body) = request(
            &app,
            Method::PUT,
            &path,
            Some(json!({ "requiere_series": true })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "requiere_series cannot be changed after creation"
        );
    }

    #[tokio::test]
    async fn test_update_quantity_on_serial_element_rejected() {
        let app = test_app().await;
        let created = create_serial_element(&app, "Proyector", &["PRJ-9"]).await;

        let path = format!("/elementos/{}", created["id"].as_str().unwrap());
        let (status, body) =
            request(&app, Method::PUT, &path, Some(json!({ "cantidad": 5 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "cantidad cannot be changed after creation");
    }

    #[tokio::test]
    async fn test_update_missing_element() {
        let app = test_app().await;
        let (status, _) = request(
            &app,
            Method::PUT,
            "/elementos/ghost",
            Some(json!({ "nombre": "X" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_element() {
        let app = test_app().await;
        let created = create_lot(&app, "Mesa", 4).await;
        let path = format!("/elementos/{}", created["id"].as_str().unwrap());

        let (status, body) = request(&app, Method::DELETE, &path, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], created["id"]);

        let (status, _) = request(&app, Method::GET, &path, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_missing_element() {
        let app = test_app().await;
        let (status, _) = request(&app, Method::DELETE, "/elementos/ghost", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
