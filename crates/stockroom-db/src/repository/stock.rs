//! # Stock Repository
//!
//! Database operations for stock items.
//!
//! ## Key Operations
//! - Filtered count + page (through [`super::filter`])
//! - Detail lookup joined with the category name
//! - Insert / partial update / delete
//!
//! ## Reads Always Join
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stocks s LEFT JOIN categories c ON c.id = s.category_id                │
//! │                                                                         │
//! │  id │ name        │ inventory │ category_id │ category_name             │
//! │  ───┼─────────────┼───────────┼─────────────┼──────────────             │
//! │   3 │ Cola 500ml  │        12 │           1 │ Drinks                    │
//! │   2 │ Orphan row  │         0 │           9 │ NULL  ← None, not error   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::filter::{self, fold_case, STOCK_COLUMNS};
use stockroom_core::{StockFilter, StockPatch, StockRecord};

/// Repository for stock database operations.
///
/// ## Usage
/// ```rust,ignore
/// let mut session = db.session().await?;
///
/// let total = session.stocks().count(&filter).await?;
/// let rows = session.stocks().page(&filter, window.limit, window.offset).await?;
/// ```
pub struct StockRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> StockRepository<'c> {
    /// Creates a new StockRepository on the given connection.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        StockRepository { conn }
    }

    /// Counts stocks matching `filter`.
    pub async fn count(&mut self, filter: &StockFilter) -> DbResult<i64> {
        let mut qb = filter::count_query(filter);
        let total = qb
            .build_query_scalar::<i64>()
            .fetch_one(&mut *self.conn)
            .await?;

        debug!(?filter, total, "Counted stocks");
        Ok(total)
    }

    /// Fetches one page of stocks matching `filter`, newest first.
    ///
    /// ## Arguments
    /// * `filter` - Same filter passed to [`count`](Self::count)
    /// * `limit` - Rows per page
    /// * `offset` - Rows to skip
    pub async fn page(
        &mut self,
        filter: &StockFilter,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<StockRecord>> {
        let mut qb = filter::page_query(filter, limit, offset);
        let records = qb
            .build_query_as::<StockRecord>()
            .fetch_all(&mut *self.conn)
            .await?;

        debug!(count = records.len(), limit, offset, "Fetched stock page");
        Ok(records)
    }

    /// Gets a stock with its category name.
    ///
    /// ## Returns
    /// * `Ok(Some(StockRecord))` - Stock found
    /// * `Ok(None)` - Stock not found
    pub async fn get(&mut self, id: i64) -> DbResult<Option<StockRecord>> {
        let sql = format!(
            "SELECT {STOCK_COLUMNS} \
             FROM stocks s LEFT JOIN categories c ON c.id = s.category_id \
             WHERE s.id = ?1"
        );

        let record = sqlx::query_as::<_, StockRecord>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(record)
    }

    /// Inserts a stock.
    ///
    /// ## Arguments
    /// * `name` - Already validated, trimmed name
    /// * `inventory` - Non-negative count
    /// * `category_id` - Existing category
    ///
    /// ## Returns
    /// * `Ok(StockRecord)` - Inserted row, joined with its category name
    /// * `Err(DbError::ForeignKeyViolation)` - Category does not exist
    pub async fn insert(
        &mut self,
        name: &str,
        inventory: i64,
        category_id: i64,
    ) -> DbResult<StockRecord> {
        debug!(name = %name, inventory, category_id, "Inserting stock");

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO stocks (name, name_folded, inventory, category_id)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(fold_case(name))
        .bind(inventory)
        .bind(category_id)
        .fetch_one(&mut *self.conn)
        .await?;

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Stock", id))
    }

    /// Applies a partial update. Fields that are `None` keep their value.
    ///
    /// ## Returns
    /// * `Ok(StockRecord)` - Row after the update
    /// * `Err(DbError::NotFound)` - No stock with this id
    /// * `Err(DbError::ForeignKeyViolation)` - New category does not exist
    pub async fn update(&mut self, id: i64, patch: &StockPatch) -> DbResult<StockRecord> {
        debug!(id, ?patch, "Updating stock");

        let result = sqlx::query(
            r#"
            UPDATE stocks SET
                name = COALESCE(?2, name),
                name_folded = COALESCE(?3, name_folded),
                inventory = COALESCE(?4, inventory),
                category_id = COALESCE(?5, category_id)
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.name.as_deref().map(fold_case))
        .bind(patch.inventory)
        .bind(patch.category_id)
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Stock", id));
        }

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Stock", id))
    }

    /// Deletes a stock.
    ///
    /// ## Returns
    /// * `Ok(())` - Row deleted
    /// * `Err(DbError::NotFound)` - No stock with this id
    pub async fn delete(&mut self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting stock");

        let result = sqlx::query("DELETE FROM stocks WHERE id = ?1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Stock", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError, Session};
    use stockroom_core::{StockFilter, StockPatch};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Drinks: Cola, Cocoa, Water 100%; Snacks: Chips, Cola Gummies.
    async fn seed(session: &mut Session) -> (i64, i64) {
        let drinks = session.categories().insert("Drinks").await.unwrap().id;
        let snacks = session.categories().insert("Snacks").await.unwrap().id;

        for (name, cat) in [
            ("Cola", drinks),
            ("Cocoa", drinks),
            ("Water 100%", drinks),
            ("Chips", snacks),
            ("Cola Gummies", snacks),
        ] {
            session.stocks().insert(name, 10, cat).await.unwrap();
        }

        (drinks, snacks)
    }

    #[tokio::test]
    async fn test_insert_and_get_joins_category_name() {
        let db = test_db().await;
        let mut session = db.session().await.unwrap();
        let cat = session.categories().insert("Drinks").await.unwrap();

        let created = session.stocks().insert("Cola", 5, cat.id).await.unwrap();
        assert_eq!(created.category_name.as_deref(), Some("Drinks"));

        let fetched = session.stocks().get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(session.stocks().get(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_with_unknown_category_is_rejected() {
        let db = test_db().await;
        let mut session = db.session().await.unwrap();

        let err = session.stocks().insert("Ghost", 1, 42).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert_eq!(
            session.stocks().count(&StockFilter::default()).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_count_and_page_agree_under_filters() {
        let db = test_db().await;
        let mut session = db.session().await.unwrap();
        let (drinks, snacks) = seed(&mut session).await;

        let all = StockFilter::default();
        assert_eq!(session.stocks().count(&all).await.unwrap(), 5);

        let by_cat = StockFilter::new(Some(drinks), None);
        assert_eq!(session.stocks().count(&by_cat).await.unwrap(), 3);

        let by_kw = StockFilter::new(None, Some("cola"));
        assert_eq!(session.stocks().count(&by_kw).await.unwrap(), 2);

        let both = StockFilter::new(Some(snacks), Some("COLA"));
        let rows = session.stocks().page(&both, 20, 0).await.unwrap();
        assert_eq!(session.stocks().count(&both).await.unwrap(), 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Cola Gummies");
    }

    #[tokio::test]
    async fn test_page_is_newest_first() {
        let db = test_db().await;
        let mut session = db.session().await.unwrap();
        seed(&mut session).await;

        let all = StockFilter::default();
        let first = session.stocks().page(&all, 2, 0).await.unwrap();
        let names: Vec<_> = first.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Cola Gummies", "Chips"]);

        let last = session.stocks().page(&all, 2, 4).await.unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].name, "Cola");
    }

    #[tokio::test]
    async fn test_keyword_wildcards_match_literally() {
        let db = test_db().await;
        let mut session = db.session().await.unwrap();
        seed(&mut session).await;

        let percent = StockFilter::new(None, Some("%"));
        let rows = session.stocks().page(&percent, 20, 0).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Water 100%");

        let underscore = StockFilter::new(None, Some("_"));
        assert_eq!(session.stocks().count(&underscore).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_keyword_folds_non_ascii_case() {
        let db = test_db().await;
        let mut session = db.session().await.unwrap();
        let fruit = session.categories().insert("Fruit").await.unwrap().id;
        session.stocks().insert("Äpfel", 3, fruit).await.unwrap();
        let eclair = session.stocks().insert("Éclair", 1, fruit).await.unwrap();

        for keyword in ["äpfel", "ÄPFEL", "pF"] {
            let filter = StockFilter::new(None, Some(keyword));
            assert_eq!(session.stocks().count(&filter).await.unwrap(), 1, "{keyword}");
        }

        let filter = StockFilter::new(None, Some("éCLAIR"));
        let rows = session.stocks().page(&filter, 20, 0).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Éclair");

        // Renames refresh the folded copy
        let patch = StockPatch {
            name: Some("Öl".to_string()),
            ..Default::default()
        };
        session.stocks().update(eclair.id, &patch).await.unwrap();
        assert_eq!(session.stocks().count(&filter).await.unwrap(), 0);
        let oil = StockFilter::new(None, Some("öL"));
        assert_eq!(session.stocks().count(&oil).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_empty_category_yields_no_rows() {
        let db = test_db().await;
        let mut session = db.session().await.unwrap();
        seed(&mut session).await;
        let empty = session.categories().insert("Empty").await.unwrap().id;

        let filter = StockFilter::new(Some(empty), None);
        assert_eq!(session.stocks().count(&filter).await.unwrap(), 0);
        assert!(session.stocks().page(&filter, 20, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let db = test_db().await;
        let mut session = db.session().await.unwrap();
        let (_, snacks) = seed(&mut session).await;
        let cola = session
            .stocks()
            .page(&StockFilter::new(None, Some("Cola")), 1, 1)
            .await
            .unwrap()
            .remove(0);

        let patch = StockPatch {
            inventory: Some(0),
            ..Default::default()
        };
        let updated = session.stocks().update(cola.id, &patch).await.unwrap();
        assert_eq!(updated.inventory, 0);
        assert_eq!(updated.name, cola.name);
        assert_eq!(updated.category_id, cola.category_id);

        let patch = StockPatch {
            category_id: Some(snacks),
            ..Default::default()
        };
        let moved = session.stocks().update(cola.id, &patch).await.unwrap();
        assert_eq!(moved.category_name.as_deref(), Some("Snacks"));
        assert_eq!(moved.inventory, 0);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let db = test_db().await;
        let mut session = db.session().await.unwrap();

        let patch = StockPatch {
            name: Some("X".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            session.stocks().update(9999, &patch).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            session.stocks().delete(9999).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
