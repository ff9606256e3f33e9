//! Category repository - tree queries and the transactional cascade delete.

use crate::error::{DbError, DbResult};
use futures_util::future::BoxFuture;
use inventario_core::types::Category;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

/// Repository for category operations
#[derive(Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Every category, in insertion order.
    ///
    /// Insertion order is what the tree builder preserves for siblings, so
    /// the ORDER BY here decides the order clients see subcategories in.
    pub async fn list_all(&self) -> DbResult<Vec<Category>> {
        debug!("Fetching all categories");
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, parent_id, created_at FROM categories ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    /// Root categories only (no parent)
    pub async fn list_roots(&self) -> DbResult<Vec<Category>> {
        debug!("Fetching root categories");
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, parent_id, created_at
            FROM categories
            WHERE parent_id IS NULL
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    /// Direct children of a category.
    ///
    /// Fails with NotFound when the parent itself does not exist, so the
    /// API can distinguish "no children" from "no such category".
    pub async fn list_children(&self, parent_id: &str) -> DbResult<Vec<Category>> {
        debug!(parent_id = %parent_id, "Fetching child categories");
        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM categories WHERE id = ?1")
            .bind(parent_id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(DbError::not_found("Category", parent_id));
        }

        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, parent_id, created_at
            FROM categories
            WHERE parent_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    /// Get a category by ID
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        debug!(id = %id, "Fetching category by id");
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, parent_id, created_at FROM categories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    /// Insert a new category.
    ///
    /// The caller validates the parent exists beforehand; the foreign key
    /// still backstops a parent deleted in between.
    pub async fn insert(&self, category: &Category) -> DbResult<()> {
        debug!(id = %category.id, name = %category.name, "Inserting category");
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, parent_id, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.parent_id)
        .bind(category.created_at)
        .execute(&self.pool)
        .await?;
        info!(id = %category.id, "Category created");
        Ok(())
    }

    /// Delete a category and every descendant in one transaction.
    ///
    /// Children are removed before their parent (the self-referencing
    /// foreign key requires it). If any category in the subtree is still
    /// referenced by an element, that DELETE fails, the transaction rolls
    /// back, and the whole tree is left untouched.
    ///
    /// Returns the number of categories removed.
    pub async fn delete_cascade(&self, id: &str) -> DbResult<u64> {
        debug!(id = %id, "Cascading category delete");
        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM categories WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(DbError::not_found("Category", id));
        }

        let removed = delete_subtree(&mut tx, id.to_string()).await?;
        tx.commit().await?;

        info!(id = %id, removed = removed, "Category subtree deleted");
        Ok(removed)
    }
}

/// Recursive subtree delete, depth first.
///
/// Async functions cannot recurse directly (the future type would be
/// infinite), hence the BoxFuture indirection.
fn delete_subtree<'a>(
    tx: &'a mut Transaction<'static, Sqlite>,
    id: String,
) -> BoxFuture<'a, DbResult<u64>> {
    Box::pin(async move {
        let children: Vec<String> =
            sqlx::query_scalar("SELECT id FROM categories WHERE parent_id = ?1")
                .bind(&id)
                .fetch_all(&mut **tx)
                .await?;

        let mut removed = 0u64;
        for child in children {
            removed += delete_subtree(&mut *tx, child).await?;
        }

        sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(&id)
            .execute(&mut **tx)
            .await?;

        Ok(removed + 1)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use inventario_core::types::Element;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.categories();

        let category = Category::new("Sonido", None);
        repo.insert(&category).await.unwrap();

        let fetched = repo.get_by_id(&category.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Sonido");
        assert_eq!(fetched.parent_id, None);
    }

    #[tokio::test]
    async fn test_list_roots_excludes_children() {
        let db = test_db().await;
        let repo = db.categories();

        let root = Category::new("Iluminación", None);
        repo.insert(&root).await.unwrap();
        let child = Category::new("Focos", Some(root.id.clone()));
        repo.insert(&child).await.unwrap();

        let roots = repo.list_roots().await.unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].id, root.id);

        let children = repo.list_children(&root.id).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, child.id);
    }

    #[tokio::test]
    async fn test_list_children_of_missing_parent() {
        let db = test_db().await;
        let result = db.categories().list_children("no-such-id").await;
        assert!(matches!(result, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_cascade_delete_counts_whole_subtree() {
        let db = test_db().await;
        let repo = db.categories();

        let root = Category::new("Mobiliario", None);
        repo.insert(&root).await.unwrap();
        let chairs = Category::new("Sillas", Some(root.id.clone()));
        repo.insert(&chairs).await.unwrap();
        let tables = Category::new("Mesas", Some(root.id.clone()));
        repo.insert(&tables).await.unwrap();
        let folding = Category::new("Plegables", Some(chairs.id.clone()));
        repo.insert(&folding).await.unwrap();

        let removed = repo.delete_cascade(&root.id).await.unwrap();
        assert_eq!(removed, 4);
        assert!(repo.get_by_id(&root.id).await.unwrap().is_none());
        assert!(repo.get_by_id(&folding.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cascade_delete_rolls_back_when_elements_remain() {
        let db = test_db().await;
        let repo = db.categories();

        let root = Category::new("Carpas", None);
        repo.insert(&root).await.unwrap();
        let child = Category::new("Carpas 3x3", Some(root.id.clone()));
        repo.insert(&child).await.unwrap();

        // An element still references the child category.
        let element = Element::new_lot("Carpa blanca", None, Some(child.id.clone()), 4, None);
        db.elements().insert(&element, &[]).await.unwrap();

        let result = repo.delete_cascade(&root.id).await;
        assert!(matches!(result, Err(DbError::ForeignKeyViolation)));

        // Nothing was deleted, not even the empty parent.
        assert!(repo.get_by_id(&root.id).await.unwrap().is_some());
        assert!(repo.get_by_id(&child.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_cascade_delete_missing_category() {
        let db = test_db().await;
        let result = db.categories().delete_cascade("ghost").await;
        assert!(matches!(result, Err(DbError::NotFound { .. })));
    }
}
