//! Wire types.
//!
//! The frontend contract predates this server, so field names on the wire
//! are Spanish (`nombre`, `cantidad`, `numero_serie`, ...) while everything
//! internal stays English. These structs are that bridge: `From` impls map
//! domain types outward, request structs map inward.
//!
//! Money crosses the wire as euros (f64) but is stored as integer cents;
//! the conversion lives here and nowhere else.

use chrono::{DateTime, Utc};
use inventario_core::tree::CategoryNode;
use inventario_core::types::{
    Category, CleaningStatus, Element, ElementKind, ItemStatus, LotStatus, Movement,
    MovementReason,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// Money conversion
// =============================================================================

/// Cents to euros, wire direction only
pub fn cents_to_euros(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Euros to cents, rounded to the nearest cent
pub fn euros_to_cents(euros: f64) -> i64 {
    (euros * 100.0).round() as i64
}

// =============================================================================
// Category DTOs
// =============================================================================

/// One category, flat
#[derive(Debug, Serialize)]
pub struct CategoryDto {
    pub id: String,
    pub nombre: String,
    pub padre_id: Option<String>,
    pub fecha_creacion: DateTime<Utc>,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        CategoryDto {
            id: category.id,
            nombre: category.name,
            padre_id: category.parent_id,
            fecha_creacion: category.created_at,
        }
    }
}

/// One node of the category tree, children nested
#[derive(Debug, Serialize)]
pub struct CategoryNodeDto {
    pub id: String,
    pub nombre: String,
    pub padre_id: Option<String>,
    pub fecha_creacion: DateTime<Utc>,
    pub subcategorias: Vec<CategoryNodeDto>,
}

impl From<CategoryNode> for CategoryNodeDto {
    fn from(node: CategoryNode) -> Self {
        CategoryNodeDto {
            id: node.id,
            nombre: node.name,
            padre_id: node.parent_id,
            fecha_creacion: node.created_at,
            subcategorias: node
                .children
                .into_iter()
                .map(CategoryNodeDto::from)
                .collect(),
        }
    }
}

/// Result of a cascading category delete
#[derive(Debug, Serialize)]
pub struct CascadeResultDto {
    /// Number of categories removed, the target included
    pub eliminadas: u64,
}

// =============================================================================
// Element DTOs
// =============================================================================

/// One element. Kind-specific fields are optional and omitted when they do
/// not apply: `estado` only for serial-tracked elements, the cleaning
/// status, dominant status and bucket counters only for lot-tracked ones.
#[derive(Debug, Serialize)]
pub struct ElementDto {
    pub id: String,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub categoria_id: Option<String>,
    pub cantidad: i64,
    pub requiere_series: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ubicacion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<ItemStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado_limpieza: Option<CleaningStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado_dominante: Option<LotStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cantidad_disponible: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cantidad_alquilada: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cantidad_limpieza: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cantidad_mantenimiento: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cantidad_retirada: Option<i64>,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_actualizacion: DateTime<Utc>,
}

impl From<Element> for ElementDto {
    fn from(element: Element) -> Self {
        let (requiere_series, ubicacion, estado, estado_limpieza, estado_dominante, buckets) =
            match element.kind {
                ElementKind::SerialTracked { status } => (true, None, Some(status), None, None, None),
                ElementKind::LotTracked {
                    location,
                    buckets,
                    cleaning_status,
                } => (
                    false,
                    location,
                    None,
                    Some(cleaning_status),
                    Some(buckets.dominant()),
                    Some(buckets),
                ),
            };
        ElementDto {
            id: element.id,
            nombre: element.name,
            descripcion: element.description,
            categoria_id: element.category_id,
            cantidad: element.quantity,
            requiere_series,
            ubicacion,
            estado,
            estado_limpieza,
            estado_dominante,
            cantidad_disponible: buckets.map(|b| b.available),
            cantidad_alquilada: buckets.map(|b| b.rented),
            cantidad_limpieza: buckets.map(|b| b.cleaning),
            cantidad_mantenimiento: buckets.map(|b| b.maintenance),
            cantidad_retirada: buckets.map(|b| b.retired),
            fecha_creacion: element.created_at,
            fecha_actualizacion: element.updated_at,
        }
    }
}

/// Element detail: the element plus its serial list (empty for lots)
#[derive(Debug, Serialize)]
pub struct ElementDetailDto {
    #[serde(flatten)]
    pub element: ElementDto,
    pub series: Vec<SerialDto>,
}

// =============================================================================
// Serial DTOs
// =============================================================================

/// One serial-numbered unit
#[derive(Debug, Serialize)]
pub struct SerialDto {
    pub id: String,
    pub elemento_id: String,
    pub numero_serie: String,
    pub estado: ItemStatus,
    pub fecha_ingreso: DateTime<Utc>,
    pub ubicacion: Option<String>,
}

impl From<inventario_core::types::Serial> for SerialDto {
    fn from(serial: inventario_core::types::Serial) -> Self {
        SerialDto {
            id: serial.id,
            elemento_id: serial.element_id,
            numero_serie: serial.serial_number,
            estado: serial.status,
            fecha_ingreso: serial.intake_date,
            ubicacion: serial.location,
        }
    }
}

// =============================================================================
// Movement DTOs
// =============================================================================

/// One recorded lot movement
#[derive(Debug, Serialize)]
pub struct MovementDto {
    pub id: String,
    pub elemento_id: String,
    pub estado_origen: LotStatus,
    pub estado_destino: LotStatus,
    pub cantidad: i64,
    pub estado_limpieza_destino: CleaningStatus,
    pub motivo: MovementReason,
    pub descripcion: Option<String>,
    /// Euros on the wire, cents in storage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub costo_reparacion: Option<f64>,
    pub fecha: DateTime<Utc>,
}

impl From<Movement> for MovementDto {
    fn from(movement: Movement) -> Self {
        MovementDto {
            id: movement.id,
            elemento_id: movement.element_id,
            estado_origen: movement.from_status,
            estado_destino: movement.to_status,
            cantidad: movement.quantity,
            estado_limpieza_destino: movement.cleaning_status,
            motivo: movement.reason,
            descripcion: movement.description,
            costo_reparacion: movement.repair_cost_cents.map(cents_to_euros),
            fecha: movement.created_at,
        }
    }
}

/// Quantity split of a lot across the five status buckets
#[derive(Debug, Serialize)]
pub struct DistributionDto {
    #[serde(rename = "AVAILABLE")]
    pub available: i64,
    #[serde(rename = "RENTED")]
    pub rented: i64,
    #[serde(rename = "CLEANING")]
    pub cleaning: i64,
    #[serde(rename = "MAINTENANCE")]
    pub maintenance: i64,
    #[serde(rename = "RETIRED")]
    pub retired: i64,
    pub total: i64,
    pub estado_dominante: LotStatus,
}

impl From<inventario_core::types::LotBuckets> for DistributionDto {
    fn from(buckets: inventario_core::types::LotBuckets) -> Self {
        DistributionDto {
            available: buckets.available,
            rented: buckets.rented,
            cleaning: buckets.cleaning,
            maintenance: buckets.maintenance,
            retired: buckets.retired,
            total: buckets.total(),
            estado_dominante: buckets.dominant(),
        }
    }
}

/// One allowed destination from a given lot status
#[derive(Debug, Serialize)]
pub struct TransitionOptionDto {
    pub destino: LotStatus,
    pub motivo_sugerido: MovementReason,
}

/// Confirmation payload for delete endpoints
#[derive(Debug, Serialize)]
pub struct DeletedDto {
    pub id: String,
}

// =============================================================================
// Request bodies
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub nombre: String,
    #[serde(default)]
    pub padre_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SerialEntryRequest {
    pub numero_serie: String,
    #[serde(default)]
    pub estado: Option<ItemStatus>,
    #[serde(default)]
    pub ubicacion: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateElementRequest {
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub categoria_id: Option<String>,
    pub cantidad: i64,
    #[serde(default)]
    pub requiere_series: bool,
    #[serde(default)]
    pub ubicacion: Option<String>,
    /// Initial status for serial-tracked elements (default: new)
    #[serde(default)]
    pub estado: Option<ItemStatus>,
    /// Required when `requiere_series`; ignored otherwise
    #[serde(default)]
    pub series: Option<Vec<SerialEntryRequest>>,
}

/// Partial element update. Absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateElementRequest {
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub categoria_id: Option<String>,
    /// Lot elements only: re-bases the total, the delta lands in AVAILABLE
    #[serde(default)]
    pub cantidad: Option<i64>,
    #[serde(default)]
    pub ubicacion: Option<String>,
    #[serde(default)]
    pub estado: Option<ItemStatus>,
    #[serde(default)]
    pub estado_limpieza: Option<CleaningStatus>,
    /// Immutable; present only so the attempt can be rejected explicitly
    #[serde(default)]
    pub requiere_series: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSerialRequest {
    pub elemento_id: String,
    pub numero_serie: String,
    #[serde(default)]
    pub estado: Option<ItemStatus>,
    #[serde(default)]
    pub ubicacion: Option<String>,
}

/// Partial serial update. Absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSerialRequest {
    #[serde(default)]
    pub numero_serie: Option<String>,
    #[serde(default)]
    pub estado: Option<ItemStatus>,
    #[serde(default)]
    pub ubicacion: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeStateRequest {
    pub elemento_id: String,
    pub cantidad: i64,
    pub estado_origen: LotStatus,
    pub estado_destino: LotStatus,
    pub estado_limpieza_destino: CleaningStatus,
    /// Optional; when absent the suggested reason for the pair is recorded
    #[serde(default)]
    pub motivo: Option<MovementReason>,
    #[serde(default)]
    pub descripcion: Option<String>,
    /// Euros; stored as cents
    #[serde(default)]
    pub costo_reparacion: Option<f64>,
}
