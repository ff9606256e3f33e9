//! # Validation Module
//!
//! Input validation rules for Inventario.
//!
//! ## Validation Strategy
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                       Validation Layers                            │
//! │                                                                    │
//! │  Layer 1: Deserialization (serde)                                  │
//! │  ├── Type checks, enum membership (AVAILABLE, CLEAN, ...)          │
//! │  └── Rejected bodies never reach a handler                         │
//! │           │                                                        │
//! │           ▼                                                        │
//! │  Layer 2: THIS MODULE (called from apps/api handlers)              │
//! │  ├── Required fields, length limits, sign checks                   │
//! │  └── Runs before any database mutation                             │
//! │           │                                                        │
//! │           ▼                                                        │
//! │  Layer 3: Database (SQLite)                                        │
//! │  ├── NOT NULL / CHECK constraints                                  │
//! │  ├── UNIQUE constraints (serial_number)                            │
//! │  └── Foreign key constraints                                       │
//! │                                                                    │
//! │  Defense in depth: each layer catches what the previous missed     │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Error messages use the wire field names (nombre, cantidad, numero_serie)
//! because they go back to API clients verbatim.

use crate::error::ValidationError;
use crate::{MAX_NAME_LENGTH, MAX_SERIAL_NUMBER_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a category or element name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 200 characters
///
/// ## Returns
/// The trimmed name, ready to persist.
///
/// ## Example
/// ```rust
/// use inventario_core::validation::validate_name;
///
/// assert_eq!(validate_name("  Sillas plegables ").unwrap(), "Sillas plegables");
/// assert!(validate_name("").is_err());
/// ```
pub fn validate_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "nombre".to_string(),
        });
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "nombre".to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(name.to_string())
}

/// Validates a serial number.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 100 characters
///
/// Uniqueness is NOT checked here; the database enforces it and the store
/// maps the violation to a conflict.
pub fn validate_serial_number(serial_number: &str) -> ValidationResult<String> {
    let serial_number = serial_number.trim();

    if serial_number.is_empty() {
        return Err(ValidationError::Required {
            field: "numero_serie".to_string(),
        });
    }

    if serial_number.len() > MAX_SERIAL_NUMBER_LENGTH {
        return Err(ValidationError::TooLong {
            field: "numero_serie".to_string(),
            max: MAX_SERIAL_NUMBER_LENGTH,
        });
    }

    Ok(serial_number.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an element's initial or updated total quantity.
///
/// ## Rules
/// - Must be zero or positive (a lot can be empty)
pub fn validate_initial_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "cantidad".to_string(),
        });
    }

    Ok(())
}

/// Validates the quantity of a lot movement.
///
/// ## Rules
/// - Must be strictly positive: moving zero units is meaningless and
///   negative quantities would invert the transition direction
pub fn validate_movement_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "cantidad".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that a serial-tracked element creation supplies exactly one
/// serial entry per unit.
///
/// ## Rules
/// - `supplied` must equal `quantity`
///
/// ## Example
/// ```rust
/// use inventario_core::validation::validate_serial_count;
///
/// assert!(validate_serial_count(3, 3).is_ok());
/// assert!(validate_serial_count(3, 1).is_err());
/// ```
pub fn validate_serial_count(quantity: i64, supplied: usize) -> ValidationResult<()> {
    if supplied as i64 != quantity {
        return Err(ValidationError::SerialCountMismatch {
            expected: quantity,
            actual: supplied,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("Sillas").unwrap(), "Sillas");
        assert_eq!(validate_name("  Mesas  ").unwrap(), "Mesas");

        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_serial_number() {
        assert_eq!(validate_serial_number("SN-001").unwrap(), "SN-001");
        assert!(validate_serial_number("").is_err());
        assert!(validate_serial_number(&"X".repeat(150)).is_err());
    }

    #[test]
    fn test_validate_initial_quantity() {
        assert!(validate_initial_quantity(0).is_ok());
        assert!(validate_initial_quantity(25).is_ok());
        assert!(validate_initial_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_movement_quantity() {
        assert!(validate_movement_quantity(1).is_ok());
        assert!(validate_movement_quantity(100).is_ok());

        assert!(validate_movement_quantity(0).is_err());
        assert!(validate_movement_quantity(-5).is_err());
    }

    #[test]
    fn test_validate_serial_count() {
        assert!(validate_serial_count(3, 3).is_ok());
        assert!(validate_serial_count(0, 0).is_ok());

        let err = validate_serial_count(3, 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected 3 serial entries to match cantidad, got 1"
        );
    }
}
