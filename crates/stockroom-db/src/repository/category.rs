//! # Category Repository
//!
//! Database operations for categories.
//!
//! ## Key Operations
//! - Insert / rename / delete
//! - Name lookups for duplicate checks
//! - Paged listing (newest first) and the full list for filter forms
//! - Dependent-stock count for delete protection

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockroom_core::Category;

/// Repository for category database operations.
///
/// Borrowed from a [`Session`](crate::Session); every call runs inside the
/// session's transaction.
pub struct CategoryRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> CategoryRepository<'c> {
    /// Creates a new CategoryRepository on the given connection.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        CategoryRepository { conn }
    }

    /// Inserts a category.
    ///
    /// ## Arguments
    /// * `name` - Already validated, trimmed name
    ///
    /// ## Returns
    /// * `Ok(Category)` - Inserted row with its generated id
    /// * `Err(DbError::UniqueViolation)` - Name already taken
    pub async fn insert(&mut self, name: &str) -> DbResult<Category> {
        debug!(name = %name, "Inserting category");

        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES (?1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(category)
    }

    /// Gets a category by its ID.
    pub async fn get(&mut self, id: i64) -> DbResult<Option<Category>> {
        let category =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *self.conn)
                .await?;

        Ok(category)
    }

    /// Finds a category with exactly this name (case-sensitive).
    ///
    /// ## Arguments
    /// * `name` - Name to look for
    /// * `exclude_id` - Ignore this category (the one being renamed)
    pub async fn find_by_name(
        &mut self,
        name: &str,
        exclude_id: Option<i64>,
    ) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name
            FROM categories
            WHERE name = ?1
              AND (?2 IS NULL OR id <> ?2)
            LIMIT 1
            "#,
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(category)
    }

    /// Lists one page of categories, newest first.
    pub async fn list(&mut self, limit: i64, offset: i64) -> DbResult<Vec<Category>> {
        debug!(limit, offset, "Listing categories");

        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name FROM categories ORDER BY id DESC LIMIT ?1 OFFSET ?2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(categories)
    }

    /// Lists every category by name, for filter dropdowns.
    pub async fn list_by_name(&mut self) -> DbResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name ASC")
                .fetch_all(&mut *self.conn)
                .await?;

        Ok(categories)
    }

    /// Counts all categories.
    pub async fn count(&mut self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(count)
    }

    /// Renames a category.
    ///
    /// ## Returns
    /// * `Ok(Category)` - Updated row
    /// * `Err(DbError::NotFound)` - No category with this id
    /// * `Err(DbError::UniqueViolation)` - Name taken by another category
    pub async fn rename(&mut self, id: i64, name: &str) -> DbResult<Category> {
        debug!(id, name = %name, "Renaming category");

        sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = ?2 WHERE id = ?1 RETURNING id, name",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::not_found("Category", id))
    }

    /// Deletes a category.
    ///
    /// ## Returns
    /// * `Ok(())` - Row deleted
    /// * `Err(DbError::NotFound)` - No category with this id
    /// * `Err(DbError::ForeignKeyViolation)` - Stocks still reference it
    pub async fn delete(&mut self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }

    /// Counts the stocks filed under a category.
    pub async fn count_stocks(&mut self, id: i64) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stocks WHERE category_id = ?1")
            .bind(id)
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
