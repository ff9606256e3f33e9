//! # Error Types
//!
//! Domain-specific error types for inventario-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                               │
//! │                                                                    │
//! │  inventario-core errors (this file)                                │
//! │  ├── CoreError        - Domain rule violations                     │
//! │  └── ValidationError  - Input validation failures                  │
//! │                                                                    │
//! │  inventario-db errors (separate crate)                             │
//! │  └── DbError          - Database operation failures                │
//! │                                                                    │
//! │  API errors (apps/api)                                             │
//! │  └── ApiError         - What HTTP clients see (status + envelope)  │
//! │                                                                    │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client   │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (status labels, quantities)
//! 3. Errors are enum variants, never String
//! 4. Validation messages use wire field names (nombre, cantidad) because
//!    they surface verbatim to API clients

use thiserror::Error;

use crate::types::LotStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
///
/// These errors represent rule violations in the lot state machine or the
/// element model. The API layer translates them to 400 responses.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested lot state transition is not in the allowed table.
    ///
    /// ## When This Occurs
    /// - Moving stock out of Retired (terminal state)
    /// - Cleaning → Rented, Maintenance → Cleaning, and other skipped paths
    ///
    /// The message names both human-readable status labels so the client
    /// can show it as-is.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: LotStatus, to: LotStatus },

    /// The source bucket does not hold enough units.
    ///
    /// ## When This Occurs
    /// - Renting out 5 units when only 2 are Available
    /// - Completing cleaning for more units than are in Cleaning
    #[error("Insufficient quantity in {status}: available {available}, requested {requested}")]
    InsufficientQuantity {
        status: LotStatus,
        available: i64,
        requested: i64,
    },

    /// The operation only applies to lot-tracked elements.
    ///
    /// Serial-tracked elements have a flat per-unit status, not quantity
    /// buckets, so lot movements are meaningless for them.
    #[error("Element {0} is serial-tracked and has no quantity buckets")]
    NotLotTracked(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when request input doesn't meet requirements.
/// Used for early validation at the API boundary, before any mutation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or positive.
    #[error("{field} must be zero or positive")]
    MustBeNonNegative { field: String },

    /// Serial entries supplied at element creation don't match the quantity.
    #[error("Expected {expected} serial entries to match cantidad, got {actual}")]
    SerialCountMismatch { expected: i64, actual: usize },

    /// The field cannot be changed after creation.
    #[error("{field} cannot be changed after creation")]
    Immutable { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
