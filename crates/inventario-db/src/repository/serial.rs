//! Serial repository.
//!
//! A serial-tracked element's `quantity` column mirrors its serial count.
//! Creating or deleting a serial therefore adjusts the owning element in
//! the same transaction; the two rows never drift apart.

use crate::error::{DbError, DbResult};
use chrono::Utc;
use inventario_core::types::Serial;
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Repository for serial operations
#[derive(Clone)]
pub struct SerialRepository {
    pool: SqlitePool,
}

impl SerialRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All serials of one element, in intake order
    pub async fn list_for_element(&self, element_id: &str) -> DbResult<Vec<Serial>> {
        debug!(element_id = %element_id, "Fetching serials for element");
        let serials = sqlx::query_as::<_, Serial>(
            r#"
            SELECT id, element_id, serial_number, status, intake_date, location
            FROM serials
            WHERE element_id = ?1
            ORDER BY intake_date, id
            "#,
        )
        .bind(element_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(serials)
    }

    /// Get a serial by ID
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Serial>> {
        debug!(id = %id, "Fetching serial by id");
        let serial = sqlx::query_as::<_, Serial>(
            r#"
            SELECT id, element_id, serial_number, status, intake_date, location
            FROM serials
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(serial)
    }

    /// Insert a serial and bump the owning element's quantity, atomically.
    ///
    /// The guarded UPDATE doubles as the existence-and-kind check: zero rows
    /// affected means the element is missing or lot-tracked, and nothing is
    /// written. A duplicate serial number rolls the quantity bump back.
    pub async fn insert(&self, serial: &Serial) -> DbResult<()> {
        debug!(
            id = %serial.id,
            element_id = %serial.element_id,
            serial_number = %serial.serial_number,
            "Inserting serial"
        );
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE elements
            SET quantity = quantity + 1, updated_at = ?2
            WHERE id = ?1 AND requires_serials = 1
            "#,
        )
        .bind(&serial.element_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "Serial-tracked element",
                &serial.element_id,
            ));
        }

        sqlx::query(
            r#"
            INSERT INTO serials (id, element_id, serial_number, status, intake_date, location)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&serial.id)
        .bind(&serial.element_id)
        .bind(&serial.serial_number)
        .bind(serial.status)
        .bind(serial.intake_date)
        .bind(&serial.location)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        info!(id = %serial.id, element_id = %serial.element_id, "Serial created");
        Ok(())
    }

    /// Update a serial's number, status and location.
    ///
    /// The owning element and intake date are immutable.
    pub async fn update(&self, serial: &Serial) -> DbResult<()> {
        debug!(id = %serial.id, "Updating serial");
        let result = sqlx::query(
            r#"
            UPDATE serials
            SET serial_number = ?2, status = ?3, location = ?4
            WHERE id = ?1
            "#,
        )
        .bind(&serial.id)
        .bind(&serial.serial_number)
        .bind(serial.status)
        .bind(&serial.location)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Serial", &serial.id));
        }
        info!(id = %serial.id, "Serial updated");
        Ok(())
    }

    /// Delete a serial and drop the owning element's quantity, atomically
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting serial");
        let mut tx = self.pool.begin().await?;

        let element_id: Option<String> =
            sqlx::query_scalar("SELECT element_id FROM serials WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let element_id = element_id.ok_or_else(|| DbError::not_found("Serial", id))?;

        sqlx::query("DELETE FROM serials WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            UPDATE elements
            SET quantity = quantity - 1, updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(&element_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        info!(id = %id, element_id = %element_id, "Serial deleted");
        Ok(())
    }
}
