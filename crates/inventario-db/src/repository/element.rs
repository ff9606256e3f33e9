//! Element repository.
//!
//! Elements come in two tracking models (serial-tracked and lot-tracked)
//! but share one table. The [`ElementRow`] struct mirrors the flat row and
//! is folded into the domain [`Element`] with its tagged kind, so the
//! union column trick never leaks out of this file.

use crate::error::{DbError, DbResult};
use chrono::{DateTime, Utc};
use inventario_core::types::{
    CleaningStatus, Element, ElementKind, ItemStatus, LotBuckets, LotStatus, Serial,
};
use sqlx::SqlitePool;
use tracing::{debug, info};

const SELECT_COLUMNS: &str = r#"
    id, name, description, category_id, quantity, requires_serials, location,
    status, cleaning_status,
    qty_available, qty_rented, qty_cleaning, qty_maintenance, qty_retired,
    created_at, updated_at
"#;

/// Flat database row for an element, both tracking models included
#[derive(Debug, sqlx::FromRow)]
struct ElementRow {
    id: String,
    name: String,
    description: Option<String>,
    category_id: Option<String>,
    quantity: i64,
    requires_serials: bool,
    location: Option<String>,
    status: ItemStatus,
    cleaning_status: CleaningStatus,
    qty_available: i64,
    qty_rented: i64,
    qty_cleaning: i64,
    qty_maintenance: i64,
    qty_retired: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ElementRow {
    fn into_element(self) -> Element {
        let kind = if self.requires_serials {
            ElementKind::SerialTracked {
                status: self.status,
            }
        } else {
            ElementKind::LotTracked {
                location: self.location,
                buckets: LotBuckets {
                    available: self.qty_available,
                    rented: self.qty_rented,
                    cleaning: self.qty_cleaning,
                    maintenance: self.qty_maintenance,
                    retired: self.qty_retired,
                },
                cleaning_status: self.cleaning_status,
            }
        };
        Element {
            id: self.id,
            name: self.name,
            description: self.description,
            category_id: self.category_id,
            quantity: self.quantity,
            kind,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Column values derived from the element kind. Columns the other tracking
/// model does not use hold their schema defaults, keeping row shape uniform.
struct KindColumns<'a> {
    requires_serials: bool,
    location: Option<&'a str>,
    status: ItemStatus,
    cleaning_status: CleaningStatus,
    buckets: LotBuckets,
}

fn kind_columns(element: &Element) -> KindColumns<'_> {
    match &element.kind {
        ElementKind::SerialTracked { status } => KindColumns {
            requires_serials: true,
            location: None,
            status: *status,
            cleaning_status: CleaningStatus::Clean,
            buckets: LotBuckets::default(),
        },
        ElementKind::LotTracked {
            location,
            buckets,
            cleaning_status,
        } => KindColumns {
            requires_serials: false,
            location: location.as_deref(),
            status: ItemStatus::New,
            cleaning_status: *cleaning_status,
            buckets: *buckets,
        },
    }
}

/// Field changes for [`ElementRepository::update`]; `None` keeps the stored
/// value.
///
/// The quantity travels as a delta against the Available bucket, never as
/// absolute bucket values, so an update built from an earlier read cannot
/// overwrite buckets a movement has shifted in the meantime.
#[derive(Debug, Default)]
pub struct ElementChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub location: Option<String>,
    pub status: Option<ItemStatus>,
    pub cleaning_status: Option<CleaningStatus>,
    pub quantity_delta: i64,
}

/// Repository for element operations
#[derive(Clone)]
pub struct ElementRepository {
    pool: SqlitePool,
}

impl ElementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All elements, ordered by name
    pub async fn list(&self) -> DbResult<Vec<Element>> {
        debug!("Fetching all elements");
        let rows = sqlx::query_as::<_, ElementRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM elements ORDER BY name COLLATE NOCASE, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ElementRow::into_element).collect())
    }

    /// Get an element by ID
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Element>> {
        debug!(id = %id, "Fetching element by id");
        let row = sqlx::query_as::<_, ElementRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM elements WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ElementRow::into_element))
    }

    /// Total number of elements
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM elements")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Insert an element together with its initial serials, atomically.
    ///
    /// For lot-tracked elements `serials` is empty. For serial-tracked
    /// elements the caller has already checked that the serial count matches
    /// the quantity; a duplicate serial number fails the whole insert and no
    /// element row survives.
    pub async fn insert(&self, element: &Element, serials: &[Serial]) -> DbResult<()> {
        debug!(
            id = %element.id,
            name = %element.name,
            serials = serials.len(),
            "Inserting element"
        );
        let cols = kind_columns(element);
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO elements (id, name, description, category_id, quantity,
                                  requires_serials, location, status, cleaning_status,
                                  qty_available, qty_rented, qty_cleaning,
                                  qty_maintenance, qty_retired, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
        )
        .bind(&element.id)
        .bind(&element.name)
        .bind(&element.description)
        .bind(&element.category_id)
        .bind(element.quantity)
        .bind(cols.requires_serials)
        .bind(cols.location)
        .bind(cols.status)
        .bind(cols.cleaning_status)
        .bind(cols.buckets.available)
        .bind(cols.buckets.rented)
        .bind(cols.buckets.cleaning)
        .bind(cols.buckets.maintenance)
        .bind(cols.buckets.retired)
        .bind(element.created_at)
        .bind(element.updated_at)
        .execute(&mut *tx)
        .await?;

        for serial in serials {
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
        }

        tx.commit().await?;
        info!(id = %element.id, "Element created");
        Ok(())
    }

    /// Apply field changes to an element, atomically.
    ///
    /// Scalar columns merge through COALESCE so an untouched field keeps
    /// whatever the row holds now, not what the caller read earlier. The
    /// quantity delta lands on `quantity` and the Available bucket in a
    /// guarded relative UPDATE; a concurrent movement's bucket writes stay
    /// intact in either ordering, and Available can never go negative.
    /// A failed guard rolls the whole update back.
    pub async fn update(&self, id: &str, changes: &ElementChanges) -> DbResult<()> {
        debug!(id = %id, delta = changes.quantity_delta, "Updating element");
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE elements
            SET name = COALESCE(?2, name),
                description = COALESCE(?3, description),
                category_id = COALESCE(?4, category_id),
                location = COALESCE(?5, location),
                status = COALESCE(?6, status),
                cleaning_status = COALESCE(?7, cleaning_status),
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(&changes.category_id)
        .bind(&changes.location)
        .bind(changes.status)
        .bind(changes.cleaning_status)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Element", id));
        }

        if changes.quantity_delta != 0 {
            let delta = changes.quantity_delta;
            let result = sqlx::query(
                r#"
                UPDATE elements
                SET quantity = quantity + ?2, qty_available = qty_available + ?2
                WHERE id = ?1 AND qty_available + ?2 >= 0
                "#,
            )
            .bind(id)
            .bind(delta)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                let available: i64 =
                    sqlx::query_scalar("SELECT qty_available FROM elements WHERE id = ?1")
                        .bind(id)
                        .fetch_one(&mut *tx)
                        .await?;
                return Err(DbError::InsufficientQuantity {
                    status: LotStatus::Available,
                    available,
                    requested: -delta,
                });
            }
        }

        tx.commit().await?;
        info!(id = %id, "Element updated");
        Ok(())
    }

    /// Delete an element. Serials and movement history cascade at the
    /// schema level.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting element");
        let result = sqlx::query("DELETE FROM elements WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Element", id));
        }
        info!(id = %id, "Element deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use inventario_core::types::{MovementReason, NewMovement};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn rental(element_id: &str, quantity: i64) -> NewMovement {
        NewMovement {
            element_id: element_id.to_string(),
            quantity,
            from_status: LotStatus::Available,
            to_status: LotStatus::Rented,
            cleaning_status: CleaningStatus::Clean,
            reason: MovementReason::RentedOut,
            description: None,
            repair_cost_cents: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_lot_element() {
        let db = test_db().await;
        let repo = db.elements();

        let element = Element::new_lot(
            "Mantel blanco",
            Some("Mantel 2x2".to_string()),
            None,
            12,
            Some("Estantería A3".to_string()),
        );
        repo.insert(&element, &[]).await.unwrap();

        let fetched = repo.get_by_id(&element.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Mantel blanco");
        assert_eq!(fetched.quantity, 12);
        match fetched.kind {
            ElementKind::LotTracked {
                location,
                buckets,
                cleaning_status,
            } => {
                assert_eq!(location.as_deref(), Some("Estantería A3"));
                assert_eq!(buckets.available, 12);
                assert_eq!(buckets.total(), 12);
                assert_eq!(cleaning_status, CleaningStatus::Clean);
            }
            ElementKind::SerialTracked { .. } => panic!("expected lot-tracked"),
        }
    }

    #[tokio::test]
    async fn test_insert_serial_tracked_with_serials() {
        let db = test_db().await;
        let repo = db.elements();

        let element =
            Element::new_serial_tracked("Proyector", None, None, 2, ItemStatus::New);
        let serials = vec![
            Serial::new(&element.id, "PRJ-001", ItemStatus::New, None),
            Serial::new(&element.id, "PRJ-002", ItemStatus::New, None),
        ];
        repo.insert(&element, &serials).await.unwrap();

        let fetched = repo.get_by_id(&element.id).await.unwrap().unwrap();
        assert!(fetched.requires_serials());

        let stored = db.serials().list_for_element(&element.id).await.unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn test_insert_rolls_back_on_duplicate_serial() {
        let db = test_db().await;
        let repo = db.elements();

        let element =
            Element::new_serial_tracked("Altavoz", None, None, 2, ItemStatus::New);
        let serials = vec![
            Serial::new(&element.id, "SPK-1", ItemStatus::New, None),
            Serial::new(&element.id, "SPK-1", ItemStatus::New, None),
        ];
        let result = repo.insert(&element, &serials).await;
        assert!(matches!(result, Err(DbError::UniqueViolation { .. })));

        // The element insert rolled back with the failed serial.
        assert!(repo.get_by_id(&element.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_persists_changes() {
        let db = test_db().await;
        let repo = db.elements();

        let element = Element::new_lot("Silla", None, None, 10, None);
        repo.insert(&element, &[]).await.unwrap();

        let changes = ElementChanges {
            name: Some("Silla plegable".to_string()),
            ..Default::default()
        };
        repo.update(&element.id, &changes).await.unwrap();

        let fetched = repo.get_by_id(&element.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Silla plegable");
        // Untouched columns keep their values.
        assert_eq!(fetched.quantity, 10);
    }

    #[tokio::test]
    async fn test_update_missing_element() {
        let db = test_db().await;
        let changes = ElementChanges {
            name: Some("Fantasma".to_string()),
            ..Default::default()
        };
        let result = db.elements().update("ghost", &changes).await;
        assert!(matches!(result, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_applies_quantity_delta_to_available() {
        let db = test_db().await;
        let repo = db.elements();

        let element = Element::new_lot("Copas", None, None, 10, None);
        repo.insert(&element, &[]).await.unwrap();
        db.movements()
            .apply(rental(&element.id, 3))
            .await
            .unwrap();

        let changes = ElementChanges {
            quantity_delta: 5,
            ..Default::default()
        };
        repo.update(&element.id, &changes).await.unwrap();

        let fetched = repo.get_by_id(&element.id).await.unwrap().unwrap();
        let buckets = fetched.buckets().copied().unwrap();
        assert_eq!(fetched.quantity, 15);
        assert_eq!(buckets.available, 12);
        assert_eq!(buckets.rented, 3);
        assert_eq!(buckets.total(), 15);
    }

    #[tokio::test]
    async fn test_update_keeps_buckets_moved_after_the_read() {
        let db = test_db().await;
        let repo = db.elements();

        let element = Element::new_lot("Carpa 3x3", None, None, 10, None);
        repo.insert(&element, &[]).await.unwrap();

        // Handler-style flow: read first, write later.
        let snapshot = repo.get_by_id(&element.id).await.unwrap().unwrap();

        // A movement commits between the read and the write.
        let mut mv = rental(&element.id, 3);
        mv.cleaning_status = CleaningStatus::VeryDirty;
        db.movements().apply(mv).await.unwrap();

        // Rename built from the stale snapshot.
        let changes = ElementChanges {
            name: Some("Carpa plegable 3x3".to_string()),
            ..Default::default()
        };
        repo.update(&snapshot.id, &changes).await.unwrap();

        // The movement's bucket shift and cleaning status both survive.
        let fetched = repo.get_by_id(&element.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Carpa plegable 3x3");
        let buckets = fetched.buckets().copied().unwrap();
        assert_eq!(buckets.rented, 3);
        assert_eq!(buckets.available, 7);
        match fetched.kind {
            ElementKind::LotTracked {
                cleaning_status, ..
            } => assert_eq!(cleaning_status, CleaningStatus::VeryDirty),
            ElementKind::SerialTracked { .. } => panic!("expected lot-tracked"),
        }
        assert_eq!(db.movements().history(&element.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_rolls_back_when_quantity_guard_fails() {
        let db = test_db().await;
        let repo = db.elements();

        let element = Element::new_lot("Vajilla", None, None, 10, None);
        repo.insert(&element, &[]).await.unwrap();
        db.movements()
            .apply(rental(&element.id, 8))
            .await
            .unwrap();

        // Shrinking by 5 needs 5 units out of Available but only 2 remain.
        let changes = ElementChanges {
            name: Some("Vajilla completa".to_string()),
            quantity_delta: -5,
            ..Default::default()
        };
        let result = repo.update(&element.id, &changes).await;
        match result {
            Err(DbError::InsufficientQuantity {
                status,
                available,
                requested,
            }) => {
                assert_eq!(status, LotStatus::Available);
                assert_eq!(available, 2);
                assert_eq!(requested, 5);
            }
            other => panic!("expected InsufficientQuantity, got {other:?}"),
        }

        // The whole update rolled back, name included.
        let fetched = repo.get_by_id(&element.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Vajilla");
        assert_eq!(fetched.quantity, 10);
        assert_eq!(fetched.buckets().unwrap().available, 2);
    }

    #[tokio::test]
    async fn test_corrupt_row_reports_conversion_error() {
        let db = test_db().await;
        let repo = db.elements();

        let element = Element::new_lot("Mesa", None, None, 1, None);
        repo.insert(&element, &[]).await.unwrap();

        // Corrupt the stored enum text behind the repository's back.
        sqlx::query("UPDATE elements SET cleaning_status = 'MOJADO' WHERE id = ?1")
            .bind(&element.id)
            .execute(&repo.pool)
            .await
            .unwrap();

        let result = repo.get_by_id(&element.id).await;
        assert!(matches!(result, Err(DbError::ConversionError(_))));
    }

    #[tokio::test]
    async fn test_delete_cascades_serials() {
        let db = test_db().await;
        let repo = db.elements();

        let element =
            Element::new_serial_tracked("Cámara", None, None, 1, ItemStatus::Good);
        let serial = Serial::new(&element.id, "CAM-77", ItemStatus::Good, None);
        repo.insert(&element, std::slice::from_ref(&serial))
            .await
            .unwrap();

        repo.delete(&element.id).await.unwrap();
        assert!(repo.get_by_id(&element.id).await.unwrap().is_none());
        assert!(db.serials().get_by_id(&serial.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_element() {
        let db = test_db().await;
        let result = db.elements().delete("ghost").await;
        assert!(matches!(result, Err(DbError::NotFound { .. })));
    }
}
