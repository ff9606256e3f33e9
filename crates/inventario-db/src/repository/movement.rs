//! Lot movement repository.
//!
//! A movement transfers units between two status buckets of a lot-tracked
//! element and appends one history row. Read, check, write and append all
//! happen inside a single transaction:
//!
//! ```text
//!   BEGIN
//!     SELECT qty_* FROM elements WHERE id = ? AND requires_serials = 0
//!     (source bucket >= quantity, or abort)
//!     UPDATE elements SET qty_* ..., cleaning_status, updated_at
//!     INSERT INTO lot_movements ...
//!   COMMIT
//! ```
//!
//! Under SQLite's single-writer model two concurrent movements on the same
//! element serialize here, so buckets can never go negative.

use crate::error::{DbError, DbResult};
use chrono::Utc;
use inventario_core::types::{LotBuckets, Movement, NewMovement};
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Bucket columns of one element row
#[derive(Debug, sqlx::FromRow)]
struct BucketRow {
    qty_available: i64,
    qty_rented: i64,
    qty_cleaning: i64,
    qty_maintenance: i64,
    qty_retired: i64,
}

impl BucketRow {
    fn into_buckets(self) -> LotBuckets {
        LotBuckets {
            available: self.qty_available,
            rented: self.qty_rented,
            cleaning: self.qty_cleaning,
            maintenance: self.qty_maintenance,
            retired: self.qty_retired,
        }
    }
}

/// Repository for lot movement operations
#[derive(Clone)]
pub struct MovementRepository {
    pool: SqlitePool,
}

impl MovementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Apply a movement: shift units between buckets, update the lot's
    /// cleaning status and append the history row, all atomically.
    ///
    /// The caller has already validated the transition itself (quantity
    /// positive, from/to pair allowed); this method enforces what only the
    /// database can know: that the element exists, is lot-tracked, and has
    /// enough units in the source bucket.
    pub async fn apply(&self, new: NewMovement) -> DbResult<Movement> {
        debug!(
            element_id = %new.element_id,
            quantity = new.quantity,
            from = %new.from_status,
            to = %new.to_status,
            "Applying lot movement"
        );
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, BucketRow>(
            r#"
            SELECT qty_available, qty_rented, qty_cleaning, qty_maintenance, qty_retired
            FROM elements
            WHERE id = ?1 AND requires_serials = 0
            "#,
        )
        .bind(&new.element_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Lot element", &new.element_id))?;

        let mut buckets = row.into_buckets();
        let available = buckets.get(new.from_status);
        if available < new.quantity {
            return Err(DbError::InsufficientQuantity {
                status: new.from_status,
                available,
                requested: new.quantity,
            });
        }

        *buckets.get_mut(new.from_status) -= new.quantity;
        *buckets.get_mut(new.to_status) += new.quantity;

        // Total quantity is unchanged by a transfer; only the split moves.
        sqlx::query(
            r#"
            UPDATE elements
            SET qty_available = ?2, qty_rented = ?3, qty_cleaning = ?4,
                qty_maintenance = ?5, qty_retired = ?6,
                cleaning_status = ?7, updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&new.element_id)
        .bind(buckets.available)
        .bind(buckets.rented)
        .bind(buckets.cleaning)
        .bind(buckets.maintenance)
        .bind(buckets.retired)
        .bind(new.cleaning_status)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        let movement = Movement::record(new);
        sqlx::query(
            r#"
            INSERT INTO lot_movements (id, element_id, from_status, to_status, quantity,
                                       cleaning_status, reason, description,
                                       repair_cost_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&movement.id)
        .bind(&movement.element_id)
        .bind(movement.from_status)
        .bind(movement.to_status)
        .bind(movement.quantity)
        .bind(movement.cleaning_status)
        .bind(movement.reason)
        .bind(&movement.description)
        .bind(movement.repair_cost_cents)
        .bind(movement.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        info!(
            movement_id = %movement.id,
            element_id = %movement.element_id,
            "Lot movement applied"
        );
        Ok(movement)
    }

    /// Movement history of one element, newest first.
    ///
    /// Fails with NotFound when the element does not exist, so an empty
    /// history and a wrong id are distinguishable.
    pub async fn history(&self, element_id: &str) -> DbResult<Vec<Movement>> {
        debug!(element_id = %element_id, "Fetching movement history");
        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM elements WHERE id = ?1")
            .bind(element_id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(DbError::not_found("Element", element_id));
        }

        let movements = sqlx::query_as::<_, Movement>(
            r#"
            SELECT id, element_id, from_status, to_status, quantity, cleaning_status,
                   reason, description, repair_cost_cents, created_at
            FROM lot_movements
            WHERE element_id = ?1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(element_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(movements)
    }
}
