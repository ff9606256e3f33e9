//! # Database Error Types
//!
//! Error handling for all database operations. Errors are classified so the
//! API layer can map them onto HTTP status codes without string matching.
//!
//! ## Classification
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                            DbError                                 │
//! │                                                                    │
//! │  NotFound              → the row you asked for does not exist      │
//! │  UniqueViolation       → duplicate value in a UNIQUE column        │
//! │  ForeignKeyViolation   → row is referenced by (or references)      │
//! │                          another table                             │
//! │  InsufficientQuantity  → a lot movement asked for more units than  │
//! │                          the source bucket holds                   │
//! │  ConversionError       → a stored value would not decode into its  │
//! │                          domain type                               │
//! │  ConnectionFailed      → could not reach the database              │
//! │  PoolExhausted         → all pooled connections are busy           │
//! │  MigrationFailed       → schema migration did not apply            │
//! │  QueryFailed           → anything else sqlx reports                │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! SQLite reports constraint violations as generic database errors with a
//! message prefix, so the `From<sqlx::Error>` impl inspects the message to
//! recover the UNIQUE / FOREIGN KEY distinction.

use inventario_core::types::LotStatus;
use thiserror::Error;

/// Errors that can occur during database operations
#[derive(Error, Debug)]
pub enum DbError {
    /// Failed to connect to the database
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed to apply
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A query failed to execute
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Record not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation
    #[error("Duplicate value for {field}")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation
    #[error("Referenced record does not exist or is still referenced")]
    ForeignKeyViolation,

    /// A lot movement requested more units than the source bucket holds.
    ///
    /// Detected inside the movement transaction, after the bucket row has
    /// been read but before anything is written.
    #[error("Insufficient quantity in {status}: available {available}, requested {requested}")]
    InsufficientQuantity {
        status: LotStatus,
        available: i64,
        requested: i64,
    },

    /// Connection pool exhausted
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// A stored value would not decode into its domain type.
    ///
    /// Points at a corrupt row (for instance an enum column edited outside
    /// the application), so it maps to an internal error, not bad input.
    #[error("Data conversion error: {0}")]
    ConversionError(String),
}

/// Convert sqlx errors to our error type
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool closed".to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                DbError::ConversionError(err.to_string())
            }
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                if msg.contains("UNIQUE constraint failed") {
                    // Extract field name from error like:
                    // "UNIQUE constraint failed: serials.serial_number"
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }
            _ => DbError::QueryFailed(err.to_string()),
        }
    }
}

/// Convert migration errors
impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl DbError {
    /// Create a NotFound error for a specific entity
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a UniqueViolation error for a specific field
    pub fn duplicate(field: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
        }
    }
}

/// Result type alias for database operations
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = DbError::not_found("Category", "abc-123");
        assert_eq!(err.to_string(), "Category not found: abc-123");
    }

    #[test]
    fn test_duplicate_display() {
        let err = DbError::duplicate("serials.serial_number");
        assert_eq!(err.to_string(), "Duplicate value for serials.serial_number");
    }

    #[test]
    fn test_insufficient_quantity_display() {
        let err = DbError::InsufficientQuantity {
            status: LotStatus::Available,
            available: 2,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient quantity in Available: available 2, requested 5"
        );
    }

    #[test]
    fn test_row_not_found_conversion() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[test]
    fn test_pool_timeout_conversion() {
        let err: DbError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, DbError::PoolExhausted));
    }

    #[test]
    fn test_column_decode_conversion() {
        let err: DbError = sqlx::Error::ColumnDecode {
            index: "cleaning_status".to_string(),
            source: "unknown value".into(),
        }
        .into();
        assert!(matches!(err, DbError::ConversionError(_)));
    }
}
