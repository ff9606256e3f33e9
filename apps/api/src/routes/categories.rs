//! Category endpoints: tree reads, creation, cascading delete.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use inventario_core::build_tree;
use inventario_core::types::Category;
use inventario_core::validation::validate_name;
use inventario_db::DbError;

use crate::dto::{CascadeResultDto, CategoryDto, CategoryNodeDto, CreateCategoryRequest};
use crate::error::{ApiError, ApiResult};
use crate::response::Envelope;
use crate::AppState;

/// GET /categorias - root categories, flat
pub async fn list_roots(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Envelope<Vec<CategoryDto>>>> {
    let roots = state.db.categories().list_roots().await?;
    let count = roots.len();
    let data: Vec<CategoryDto> = roots.into_iter().map(CategoryDto::from).collect();
    Ok(Json(Envelope::ok_list(data, count)))
}

/// GET /categorias/jerarquia - the whole tree, nested
///
/// `count` is the number of roots, not of all nodes.
pub async fn tree(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Envelope<Vec<CategoryNodeDto>>>> {
    let categories = state.db.categories().list_all().await?;
    let nodes = build_tree(categories);
    let count = nodes.len();
    let data: Vec<CategoryNodeDto> = nodes.into_iter().map(CategoryNodeDto::from).collect();
    Ok(Json(Envelope::ok_list(data, count)))
}

/// GET /categorias/{id}/subcategorias - direct children, 404 if the
/// category itself is missing
pub async fn children(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Vec<CategoryDto>>>> {
    let children = state.db.categories().list_children(&id).await?;
    let count = children.len();
    let data: Vec<CategoryDto> = children.into_iter().map(CategoryDto::from).collect();
    Ok(Json(Envelope::ok_list(data, count)))
}

/// POST /categorias - create, validating the parent exists first
pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<CategoryDto>>)> {
    let Json(req) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let name = validate_name(&req.nombre)?;

    if let Some(parent_id) = &req.padre_id {
        if state.db.categories().get_by_id(parent_id).await?.is_none() {
            return Err(DbError::not_found("Category", parent_id).into());
        }
    }

    let category = Category::new(name, req.padre_id);
    state.db.categories().insert(&category).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(CategoryDto::from(category))),
    ))
}

/// DELETE /categorias/{id} - removes the whole subtree in one transaction;
/// answers how many categories went with it
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<CascadeResultDto>>> {
    let removed = state.db.categories().delete_cascade(&id).await?;
    Ok(Json(Envelope::ok(CascadeResultDto { eliminadas: removed })))
}
