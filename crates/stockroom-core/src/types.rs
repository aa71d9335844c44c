//! # Domain Types
//!
//! The two persisted entities and the payloads that create or change them.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐  1      *  ┌─────────────────────────┐            │
//! │  │    Category     │◄───────────│         Stock           │            │
//! │  │  ─────────────  │            │  ─────────────────────  │            │
//! │  │  id (i64)       │            │  id (i64)               │            │
//! │  │  name (unique)  │            │  name (non-unique)      │            │
//! │  └─────────────────┘            │  inventory (>= 0)       │            │
//! │                                 │  category_id (FK)       │            │
//! │                                 └─────────────────────────┘            │
//! │                                                                         │
//! │  StockRecord = Stock + category_name (Option, from LEFT JOIN)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Optional Relation
//! A stock's category is read through an outer join, so the read model
//! carries `category_name: Option<String>`. A missing row on the category
//! side is represented as `None` and is never an error.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::validation::normalize_keyword;

// =============================================================================
// Category
// =============================================================================

/// A stock category. Names are unique (case-sensitive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    #[ts(type = "number")]
    pub id: i64,
    pub name: String,
}

/// Body of `POST /api/categories`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

/// Body of `PATCH /api/categories/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    #[serde(default)]
    pub name: Option<String>,
}

// =============================================================================
// Stock
// =============================================================================

/// A stock row joined with its category's name.
///
/// This is the single read model for stocks; both the API shape and the
/// template shape in [`crate::normalize`] are derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockRecord {
    pub id: i64,
    pub name: String,
    pub inventory: i64,
    pub category_id: i64,
    /// `None` when the outer join found no category.
    pub category_name: Option<String>,
}

/// Body of `POST /api/stocks`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStock {
    pub name: String,
    pub inventory: i64,
    pub category_id: i64,
}

/// Body of `PUT`/`PATCH /api/stocks/{id}`.
///
/// Every field is independently optional; only the supplied ones change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub inventory: Option<i64>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

impl StockPatch {
    /// True when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.inventory.is_none() && self.category_id.is_none()
    }
}

// =============================================================================
// Stock Filter
// =============================================================================

/// Optional predicates narrowing a stock listing.
///
/// Both predicates are combined with AND; with neither set the listing is
/// unfiltered. The keyword is stored already trimmed, and a blank keyword
/// is dropped, so `keyword.is_some()` always means "filter by name".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockFilter {
    /// Exact match on `category_id`.
    pub category_id: Option<i64>,
    /// Case-insensitive substring of `name`.
    pub keyword: Option<String>,
}

impl StockFilter {
    /// Builds a filter from raw request values.
    pub fn new(category_id: Option<i64>, keyword: Option<&str>) -> Self {
        StockFilter {
            category_id,
            keyword: normalize_keyword(keyword),
        }
    }

    /// True when no predicate is set.
    pub fn is_unfiltered(&self) -> bool {
        self.category_id.is_none() && self.keyword.is_none()
    }

    /// Keyword for echoing back into forms ("" when absent).
    pub fn keyword_or_empty(&self) -> &str {
        self.keyword.as_deref().unwrap_or("")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
