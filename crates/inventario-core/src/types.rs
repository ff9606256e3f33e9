//! # Domain Types
//!
//! Core domain types used throughout Inventario.
//!
//! ## Type Hierarchy
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                              │
//! │                                                                    │
//! │  ┌────────────────┐   ┌────────────────────┐   ┌───────────────┐  │
//! │  │   Category     │   │      Element       │   │    Serial     │  │
//! │  │  ────────────  │   │  ────────────────  │   │  ───────────  │  │
//! │  │  id (UUID)     │   │  id (UUID)         │   │  id (UUID)    │  │
//! │  │  name          │   │  name, quantity    │   │  element_id   │  │
//! │  │  parent_id?    │   │  kind (tagged)     │   │  serial_number│  │
//! │  └────────────────┘   └────────────────────┘   └───────────────┘  │
//! │                                                                    │
//! │  ElementKind (tagged union on requires_serials)                    │
//! │  ├── SerialTracked { status }               one row per unit       │
//! │  └── LotTracked { location, buckets,        interchangeable units  │
//! │                   cleaning_status }         split across buckets   │
//! │                                                                    │
//! │  LotBuckets: available / rented / cleaning / maintenance / retired │
//! │  Movement:   append-only record of one bucket-to-bucket transfer   │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Tracking Models
//! Elements are either serial-tracked (every physical unit has its own row
//! and flat status) or lot-tracked (units are interchangeable and only
//! counted, partitioned across operational status buckets). The two models
//! never mix on one element and the choice is fixed at creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Lot Status
// =============================================================================

/// Operational status bucket for lot-tracked stock.
///
/// Each value corresponds to one quantity column on the element row. The
/// declaration order is also the tie-break order for [`LotBuckets::dominant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LotStatus {
    /// In stock and ready to go out.
    Available,
    /// Out with a customer.
    Rented,
    /// Back from rental, being cleaned.
    Cleaning,
    /// Under repair.
    Maintenance,
    /// Removed from circulation. Terminal: no outbound transitions.
    Retired,
}

impl LotStatus {
    /// All statuses in fixed enumeration order.
    pub const ALL: [LotStatus; 5] = [
        LotStatus::Available,
        LotStatus::Rented,
        LotStatus::Cleaning,
        LotStatus::Maintenance,
        LotStatus::Retired,
    ];

    /// Human-readable label, used in error messages shown to clients.
    pub const fn label(&self) -> &'static str {
        match self {
            LotStatus::Available => "Available",
            LotStatus::Rented => "Rented",
            LotStatus::Cleaning => "Cleaning",
            LotStatus::Maintenance => "Maintenance",
            LotStatus::Retired => "Retired",
        }
    }
}

impl std::fmt::Display for LotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Default for LotStatus {
    fn default() -> Self {
        LotStatus::Available
    }
}

// =============================================================================
// Cleaning Status
// =============================================================================

/// Cleanliness of a lot, independent of its operational buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CleaningStatus {
    Clean,
    Good,
    Dirty,
    VeryDirty,
    Damaged,
}

impl Default for CleaningStatus {
    fn default() -> Self {
        CleaningStatus::Clean
    }
}

// =============================================================================
// Movement Reason
// =============================================================================

/// Why a lot movement happened.
///
/// Recorded on every movement row. [`crate::transitions::suggested_reason`]
/// proposes one per transition pair; callers may override it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementReason {
    ManualAdjustment,
    CleaningCompleted,
    RepairCompleted,
    DamagedInUse,
    Discarded,
    Lost,
    RentedOut,
    ReturnedClean,
    ReturnedDirty,
    ReturnedDamaged,
}

impl Default for MovementReason {
    fn default() -> Self {
        MovementReason::ManualAdjustment
    }
}

// =============================================================================
// Item Status (legacy flat model)
// =============================================================================

/// Flat per-unit status for serial-tracked elements and their serials.
///
/// This is the older status model. Lot-tracked elements ignore it and use
/// [`LotStatus`] buckets instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    New,
    Good,
    Maintenance,
    Loaned,
    Damaged,
    Depleted,
}

impl Default for ItemStatus {
    fn default() -> Self {
        ItemStatus::New
    }
}

// =============================================================================
// Category
// =============================================================================

/// A node in the category hierarchy.
///
/// `parent_id = None` marks a root. The parent graph is a forest by
/// construction: a parent must exist before a child can reference it, and
/// there is no re-parenting operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Parent category, None for roots.
    pub parent_id: Option<String>,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Creates a new category with a fresh id and timestamp.
    pub fn new(name: impl Into<String>, parent_id: Option<String>) -> Self {
        Category {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            parent_id,
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// Lot Buckets
// =============================================================================

/// Quantity of a lot element split across the five operational statuses.
///
/// Invariant: every bucket is >= 0 and the buckets sum to the element's
/// total quantity. The movement transaction in inventario-db is the only
/// writer that moves units between buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotBuckets {
    pub available: i64,
    pub rented: i64,
    pub cleaning: i64,
    pub maintenance: i64,
    pub retired: i64,
}

impl LotBuckets {
    /// Buckets for a freshly created lot: everything starts Available.
    pub fn with_available(quantity: i64) -> Self {
        LotBuckets {
            available: quantity,
            ..LotBuckets::default()
        }
    }

    /// Total units across all buckets.
    pub fn total(&self) -> i64 {
        self.available + self.rented + self.cleaning + self.maintenance + self.retired
    }

    /// Count in one bucket.
    pub fn get(&self, status: LotStatus) -> i64 {
        match status {
            LotStatus::Available => self.available,
            LotStatus::Rented => self.rented,
            LotStatus::Cleaning => self.cleaning,
            LotStatus::Maintenance => self.maintenance,
            LotStatus::Retired => self.retired,
        }
    }

    /// Mutable count in one bucket.
    pub fn get_mut(&mut self, status: LotStatus) -> &mut i64 {
        match status {
            LotStatus::Available => &mut self.available,
            LotStatus::Rented => &mut self.rented,
            LotStatus::Cleaning => &mut self.cleaning,
            LotStatus::Maintenance => &mut self.maintenance,
            LotStatus::Retired => &mut self.retired,
        }
    }

    /// The bucket holding the most units.
    ///
    /// Ties break in favor of the first status in [`LotStatus::ALL`] order,
    /// so an even Available/Rented split reports Available.
    pub fn dominant(&self) -> LotStatus {
        let mut best = LotStatus::Available;
        for status in LotStatus::ALL {
            if self.get(status) > self.get(best) {
                best = status;
            }
        }
        best
    }
}

// =============================================================================
// Element
// =============================================================================

/// Kind-specific payload of an element, fixed at creation.
///
/// ## Why a tagged union?
/// The two tracking models have disjoint state: a serial-tracked element has
/// one flat status and no buckets; a lot-tracked element has buckets, a
/// cleaning status and a shared location. Modeling them as one struct full
/// of optional fields invites impossible states (buckets on a serial-tracked
/// element); the enum makes those unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ElementKind {
    /// Every unit has its own Serial row; quantity mirrors the serial count.
    SerialTracked { status: ItemStatus },
    /// Interchangeable units counted in buckets.
    LotTracked {
        /// Where the lot is stored. Serial-tracked units carry their own.
        location: Option<String>,
        buckets: LotBuckets,
        cleaning_status: CleaningStatus,
    },
}

/// An inventory item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Category this element belongs to, if any.
    pub category_id: Option<String>,
    /// Total units. For serial-tracked elements this always equals the
    /// number of serial rows; for lots it equals the bucket sum.
    pub quantity: i64,
    /// Tracking model and its state.
    pub kind: ElementKind,
    /// When the element was created.
    pub created_at: DateTime<Utc>,
    /// When the element was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Element {
    /// Creates a lot-tracked element with the full quantity Available and
    /// cleaning status Clean.
    pub fn new_lot(
        name: impl Into<String>,
        description: Option<String>,
        category_id: Option<String>,
        quantity: i64,
        location: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Element {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description,
            category_id,
            quantity,
            kind: ElementKind::LotTracked {
                location,
                buckets: LotBuckets::with_available(quantity),
                cleaning_status: CleaningStatus::Clean,
            },
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a serial-tracked element. The caller supplies the matching
    /// serial entries separately; `quantity` must equal their count.
    pub fn new_serial_tracked(
        name: impl Into<String>,
        description: Option<String>,
        category_id: Option<String>,
        quantity: i64,
        status: ItemStatus,
    ) -> Self {
        let now = Utc::now();
        Element {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description,
            category_id,
            quantity,
            kind: ElementKind::SerialTracked { status },
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this element tracks individual serial numbers.
    pub fn requires_serials(&self) -> bool {
        matches!(self.kind, ElementKind::SerialTracked { .. })
    }

    /// The lot buckets, if this is a lot-tracked element.
    pub fn buckets(&self) -> Option<&LotBuckets> {
        match &self.kind {
            ElementKind::LotTracked { buckets, .. } => Some(buckets),
            ElementKind::SerialTracked { .. } => None,
        }
    }
}

// =============================================================================
// Serial
// =============================================================================

/// One physical unit of a serial-tracked element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Serial {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Owning element.
    pub element_id: String,
    /// Unique across the whole system, not just within the element.
    pub serial_number: String,
    /// Flat per-unit status.
    pub status: ItemStatus,
    /// When the unit entered inventory.
    pub intake_date: DateTime<Utc>,
    /// Where this unit is stored.
    pub location: Option<String>,
}

impl Serial {
    /// Creates a serial with a fresh id and intake date now.
    pub fn new(
        element_id: impl Into<String>,
        serial_number: impl Into<String>,
        status: ItemStatus,
        location: Option<String>,
    ) -> Self {
        Serial {
            id: Uuid::new_v4().to_string(),
            element_id: element_id.into(),
            serial_number: serial_number.into(),
            status,
            intake_date: Utc::now(),
            location,
        }
    }
}

// =============================================================================
// Movement
// =============================================================================

/// Input for one lot movement, before the store stamps id and timestamp.
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub element_id: String,
    pub quantity: i64,
    pub from_status: LotStatus,
    pub to_status: LotStatus,
    /// Cleaning status the lot ends up in after the move.
    pub cleaning_status: CleaningStatus,
    pub reason: MovementReason,
    pub description: Option<String>,
    /// Repair cost in cents. Integer, never floating point.
    pub repair_cost_cents: Option<i64>,
}

/// One recorded bucket-to-bucket transfer. Append-only history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Movement {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Element whose lot moved.
    pub element_id: String,
    /// Source bucket.
    pub from_status: LotStatus,
    /// Destination bucket.
    pub to_status: LotStatus,
    /// Units moved. Always positive.
    pub quantity: i64,
    /// Cleaning status after the move.
    pub cleaning_status: CleaningStatus,
    /// Why the move happened.
    pub reason: MovementReason,
    /// Optional free-text detail.
    pub description: Option<String>,
    /// Repair cost in cents, when the move involved a repair.
    pub repair_cost_cents: Option<i64>,
    /// Server-assigned timestamp.
    pub created_at: DateTime<Utc>,
}

impl Movement {
    /// Stamps a new movement record with a fresh id and server timestamp.
    pub fn record(new: NewMovement) -> Self {
        Movement {
            id: Uuid::new_v4().to_string(),
            element_id: new.element_id,
            from_status: new.from_status,
            to_status: new.to_status,
            quantity: new.quantity,
            cleaning_status: new.cleaning_status,
            reason: new.reason,
            description: new.description,
            repair_cost_cents: new.repair_cost_cents,
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
