//! # Stock Listing Query Builder
//!
//! Composes the optional listing predicates onto a SQL query.
//!
//! ## One Filter, Two Queries
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  StockFilter { category_id?, keyword? }                                 │
//! │       │                                                                 │
//! │       ├──► count_query()  SELECT COUNT(*) FROM <base> [WHERE ...]      │
//! │       │                                                                 │
//! │       └──► page_query()   SELECT <columns> FROM <base> [WHERE ...]     │
//! │                           ORDER BY s.id DESC LIMIT ? OFFSET ?          │
//! │                                                                         │
//! │  <base> = stocks s LEFT JOIN categories c ON c.id = s.category_id      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both queries get their WHERE clause from [`push_filter`], so the total
//! always counts exactly the rows the pages slice.
//!
//! ## Keyword Matching
//! The keyword is a case-insensitive substring of the stock name. SQLite's
//! `LIKE` only folds ASCII letters, so both sides are folded in Rust with
//! [`fold_case`]: writes store `name_folded`, and the keyword is folded
//! before it is bound. `%`, `_` and `\` in the keyword are escaped, so they
//! match themselves.
//!
//! ```text
//! name "Äpfel"   ──fold_case──►  name_folded "äpfel"
//! keyword "ÄPF"  ──fold_case──►  LIKE '%äpf%' ESCAPE '\'   ✓
//! ```

use sqlx::{QueryBuilder, Sqlite};

use stockroom_core::StockFilter;

/// Relation every stock listing reads from.
const STOCK_BASE: &str = " FROM stocks s LEFT JOIN categories c ON c.id = s.category_id";

/// Columns of [`stockroom_core::StockRecord`].
pub(crate) const STOCK_COLUMNS: &str =
    "s.id, s.name, s.inventory, s.category_id, c.name AS category_name";

/// Case folding shared by stored names and search keywords.
#[inline]
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Escapes LIKE wildcards so `keyword` is matched literally.
///
/// ## Example
/// ```rust
/// use stockroom_db::repository::filter::escape_like;
///
/// assert_eq!(escape_like("100%"), "100\\%");
/// assert_eq!(escape_like("a_b"), "a\\_b");
/// ```
pub fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for ch in keyword.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Appends the WHERE clause for `filter` (nothing when unfiltered).
pub fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &StockFilter) {
    let mut prefix = " WHERE ";

    if let Some(category_id) = filter.category_id {
        qb.push(prefix).push("s.category_id = ").push_bind(category_id);
        prefix = " AND ";
    }

    if let Some(keyword) = filter.keyword.as_deref() {
        qb.push(prefix)
            .push("s.name_folded LIKE ")
            .push_bind(format!("%{}%", escape_like(&fold_case(keyword))))
            .push(" ESCAPE '\\'");
    }
}

/// Builds `SELECT COUNT(*)` over the filtered relation.
pub fn count_query(filter: &StockFilter) -> QueryBuilder<'static, Sqlite> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*)");
    qb.push(STOCK_BASE);
    push_filter(&mut qb, filter);
    qb
}

/// Builds one page of the filtered relation, newest first.
///
/// ## Arguments
/// * `filter` - Listing predicates
/// * `limit` - Rows per page
/// * `offset` - Rows to skip
pub fn page_query(filter: &StockFilter, limit: i64, offset: i64) -> QueryBuilder<'static, Sqlite> {
    let mut qb = QueryBuilder::new("SELECT ");
    qb.push(STOCK_COLUMNS).push(STOCK_BASE);
    push_filter(&mut qb, filter);
    qb.push(" ORDER BY s.id DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    qb
}

// =============================================================================
// Unit Tests
// =============================================================================
