//! # Lot State Machine
//!
//! Transition rules for lot-tracked stock. Pure policy: the actual bucket
//! arithmetic and persistence happen in inventario-db, inside one
//! transaction, using these functions as the gate.
//!
//! ## Transition Table
//! ```text
//! ┌─────────────┬──────────────────────────────────────────────┐
//! │ From        │ Allowed To                                   │
//! ├─────────────┼──────────────────────────────────────────────┤
//! │ AVAILABLE   │ RENTED, CLEANING, MAINTENANCE, RETIRED       │
//! │ RENTED      │ AVAILABLE, CLEANING, MAINTENANCE, RETIRED    │
//! │ CLEANING    │ AVAILABLE, MAINTENANCE                       │
//! │ MAINTENANCE │ AVAILABLE, RETIRED                           │
//! │ RETIRED     │ (none - terminal)                            │
//! └─────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! Cleaning cannot go straight back to Rented (it must pass through
//! Available), and nothing leaves Retired.

use crate::error::{CoreError, CoreResult};
use crate::types::{LotStatus, MovementReason};
use crate::validation::validate_movement_quantity;

// =============================================================================
// Transition Table
// =============================================================================

/// The allowed destinations for a given source status.
///
/// Returns a static slice in fixed order; the transitions endpoint serves it
/// as-is so the client's picker is stable.
pub fn allowed_transitions(from: LotStatus) -> &'static [LotStatus] {
    match from {
        LotStatus::Available => &[
            LotStatus::Rented,
            LotStatus::Cleaning,
            LotStatus::Maintenance,
            LotStatus::Retired,
        ],
        LotStatus::Rented => &[
            LotStatus::Available,
            LotStatus::Cleaning,
            LotStatus::Maintenance,
            LotStatus::Retired,
        ],
        LotStatus::Cleaning => &[LotStatus::Available, LotStatus::Maintenance],
        LotStatus::Maintenance => &[LotStatus::Available, LotStatus::Retired],
        LotStatus::Retired => &[],
    }
}

/// Whether `from -> to` is in the transition table.
pub fn is_transition_allowed(from: LotStatus, to: LotStatus) -> bool {
    allowed_transitions(from).contains(&to)
}

// =============================================================================
// Movement Validation
// =============================================================================

/// Validates the pure parts of a movement request: positive quantity and an
/// allowed transition pair.
///
/// The remaining checks need persisted state and run inside the movement
/// transaction: element existence, lot-tracked kind, and sufficient units
/// in the source bucket.
pub fn validate_movement(quantity: i64, from: LotStatus, to: LotStatus) -> CoreResult<()> {
    validate_movement_quantity(quantity)?;

    if !is_transition_allowed(from, to) {
        return Err(CoreError::InvalidTransition { from, to });
    }

    Ok(())
}

// =============================================================================
// Suggested Reasons
// =============================================================================

/// The reason code a movement between two statuses usually has.
///
/// Advisory only: the change-state endpoint records the caller's reason when
/// one is supplied and falls back to this table when it isn't. Pairs without
/// an obvious business meaning map to ManualAdjustment.
pub fn suggested_reason(from: LotStatus, to: LotStatus) -> MovementReason {
    use LotStatus::*;

    match (from, to) {
        (Available, Rented) => MovementReason::RentedOut,
        (Available, Maintenance) => MovementReason::DamagedInUse,
        (Available, Retired) => MovementReason::Discarded,
        (Rented, Available) => MovementReason::ReturnedClean,
        (Rented, Cleaning) => MovementReason::ReturnedDirty,
        (Rented, Maintenance) => MovementReason::ReturnedDamaged,
        (Rented, Retired) => MovementReason::Lost,
        (Cleaning, Available) => MovementReason::CleaningCompleted,
        (Cleaning, Maintenance) => MovementReason::DamagedInUse,
        (Maintenance, Available) => MovementReason::RepairCompleted,
        (Maintenance, Retired) => MovementReason::Discarded,
        _ => MovementReason::ManualAdjustment,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
