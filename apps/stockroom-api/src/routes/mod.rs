//! # HTTP Routes
//!
//! Handlers grouped by resource.
//!
//! ## Route Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  pages.rs        GET  /                      home page                  │
//! │                  GET  /health                liveness + database        │
//! │                  GET  /stocks                listing page (page from 0) │
//! │                                                                         │
//! │  stocks.rs       GET  /api/stocks            JSON list (page from 1)    │
//! │                  GET  /api/stocks/search     same as /api/stocks        │
//! │                  POST /api/stocks            create                     │
//! │                  GET|PUT|PATCH|DELETE /api/stocks/{id}                  │
//! │                                                                         │
//! │  categories.rs   GET|POST /api/categories    list (page from 1), create │
//! │                  GET|PATCH|DELETE /api/categories/{id}                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every handler opens one [`Session`](stockroom_db::Session) (writes use
//! `write_session`, which holds the write lock from the start) and either
//! commits it or lets it drop (rollback) on the way out.

pub mod categories;
pub mod pages;
pub mod stocks;

use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use stockroom_core::{PageWindow, Pager, StockFilter, StockRecord};
use stockroom_db::Session;

use crate::error::ApiError;

/// Response header carrying the unpaged row count of a listing.
pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

// =============================================================================
// Query Parameters
// =============================================================================

/// Query string of the stock listings (`/stocks`, `/api/stocks`).
///
/// HTML forms submit `categoryId=` for "all categories"; empty values are
/// read as absent.
#[derive(Debug, Default, Deserialize)]
pub struct StockListParams {
    #[serde(default, rename = "categoryId", deserialize_with = "empty_string_as_none")]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub size: Option<i64>,
}

impl StockListParams {
    /// Listing predicates from this query.
    pub fn filter(&self) -> StockFilter {
        StockFilter::new(self.category_id, self.keyword.as_deref())
    }
}

/// Query string of the category listing.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub size: Option<i64>,
}

/// Reads `""` (and whitespace) as `None`, anything else through `FromStr`.
fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(de)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(de::Error::custom),
    }
}

// =============================================================================
// Shared Listing Flow
// =============================================================================

/// Resolves `(page, size)` against `pager`, filling in defaults.
///
/// ## Returns
/// The page and size to use, or a validation error before any query runs.
pub fn resolve_page(
    pager: &Pager,
    page: Option<i64>,
    size: Option<i64>,
    default_size: i64,
) -> Result<(i64, i64), ApiError> {
    let page = page.unwrap_or(pager.numbering().first_page());
    let size = size.unwrap_or(default_size);
    pager.validate(page, size)?;
    Ok((page, size))
}

/// Count, clamp, then fetch: one page of stocks for `filter`.
///
/// The count and the page run in the same session and share the filter,
/// so the window always describes the rows returned.
pub async fn fetch_stock_page(
    session: &mut Session,
    pager: &Pager,
    filter: &StockFilter,
    page: i64,
    size: i64,
) -> Result<(PageWindow, Vec<StockRecord>), ApiError> {
    let total = session.stocks().count(filter).await?;
    let window = pager.window(page, size, total)?;
    let records = session
        .stocks()
        .page(filter, window.limit, window.offset)
        .await?;

    Ok((window, records))
}

// =============================================================================
// Test Support
// =============================================================================
