//! # Result Normalizer
//!
//! Maps stock records into the two output shapes the system serves.
//!
//! ## Two Consumers, One Source
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │             PageWindow  +  Vec<StockRecord>  +  StockFilter            │
//! │                               │                                         │
//! │              ┌────────────────┴────────────────┐                        │
//! │              ▼                                 ▼                        │
//! │   StockListResponse (JSON API)      StockPageContext (template)         │
//! │   ─────────────────────────────     ───────────────────────────────     │
//! │   page                              pageData { items, total, page,      │
//! │   total_pages                                  size, totalPages,        │
//! │   items: [ { id, name,                         hasPrev, hasNext,        │
//! │              inventory,                        categoryId, keyword }    │
//! │              category_id,           pageInfo { page, size, total,       │
//! │              category_name } ]                 totalPages, hasPrev,     │
//! │                                                hasNext }                │
//! │   + X-Total-Count header            stocks / items (legacy lists)       │
//! │                                     categories, categoryId, keyword     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The template context carries the canonical `pageData` block and the
//! legacy `pageInfo`/`stocks` fields side by side. Both are filled from the
//! same [`PageWindow`], so templates of either generation see the same page.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::pager::PageWindow;
use crate::types::{Category, StockFilter, StockRecord};

// =============================================================================
// JSON API Shapes
// =============================================================================

/// A stock as returned by the JSON API (list items and detail responses).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockItem {
    #[ts(type = "number")]
    pub id: i64,
    pub name: String,
    #[ts(type = "number")]
    pub inventory: i64,
    #[ts(type = "number")]
    pub category_id: i64,
    /// `null` when the stock's category could not be resolved.
    pub category_name: Option<String>,
}

impl From<StockRecord> for StockItem {
    fn from(r: StockRecord) -> Self {
        StockItem {
            id: r.id,
            name: r.name,
            inventory: r.inventory,
            category_id: r.category_id,
            category_name: r.category_name,
        }
    }
}

/// Body of `GET /api/stocks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockListResponse {
    #[ts(type = "number")]
    pub page: i64,
    #[ts(type = "number")]
    pub total_pages: i64,
    pub items: Vec<StockItem>,
}

impl StockListResponse {
    /// Shapes one page of records for the API.
    pub fn new(window: &PageWindow, records: Vec<StockRecord>) -> Self {
        StockListResponse {
            page: window.page,
            total_pages: window.total_pages,
            items: records.into_iter().map(StockItem::from).collect(),
        }
    }
}

/// Body of `201 Created` for `POST /api/stocks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockCreated {
    #[ts(type = "number")]
    pub id: i64,
    pub message: String,
    pub category_name: Option<String>,
}

impl StockCreated {
    pub fn new(record: &StockRecord) -> Self {
        StockCreated {
            id: record.id,
            message: "created".to_string(),
            category_name: record.category_name.clone(),
        }
    }
}

// =============================================================================
// Template Shapes
// =============================================================================

/// A stock as the listing template sees it (camelCase keys).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateStock {
    pub id: i64,
    pub name: String,
    pub inventory: i64,
    pub category_id: i64,
    pub category_name: Option<String>,
}

impl From<StockRecord> for TemplateStock {
    fn from(r: StockRecord) -> Self {
        TemplateStock {
            id: r.id,
            name: r.name,
            inventory: r.inventory,
            category_id: r.category_id,
            category_name: r.category_name,
        }
    }
}

/// Canonical page block (`pageData`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    pub items: Vec<TemplateStock>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
    pub total_pages: i64,
    pub has_prev: bool,
    pub has_next: bool,
    pub category_id: Option<i64>,
    pub keyword: String,
    /// Set only when the listing fell back to an empty page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Legacy page block (`pageInfo`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: i64,
    pub size: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_prev: bool,
    pub has_next: bool,
}

impl From<&PageWindow> for PageInfo {
    fn from(w: &PageWindow) -> Self {
        PageInfo {
            page: w.page,
            size: w.size,
            total: w.total,
            total_pages: w.total_pages,
            has_prev: w.has_prev,
            has_next: w.has_next,
        }
    }
}

/// Everything the stock listing template reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockPageContext {
    #[serde(rename = "pageData")]
    pub page_data: PageData,
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
    /// Legacy flat list.
    pub stocks: Vec<TemplateStock>,
    /// Legacy flat list (second alias still read by older templates).
    pub items: Vec<TemplateStock>,
    /// Options for the category filter dropdown.
    pub categories: Vec<Category>,
    #[serde(rename = "categoryId")]
    pub category_id: Option<i64>,
    pub keyword: String,
    /// Current year for the page footer.
    pub year: i32,
}

impl StockPageContext {
    /// Builds the context for one rendered page.
    ///
    /// ## Arguments
    /// * `window` - Resolved page window (already clamped)
    /// * `records` - Rows of that window
    /// * `categories` - All categories, for the filter form
    /// * `filter` - Filters echoed back into the form
    /// * `year` - Footer year
    pub fn new(
        window: &PageWindow,
        records: Vec<StockRecord>,
        categories: Vec<Category>,
        filter: &StockFilter,
        year: i32,
    ) -> Self {
        let items: Vec<TemplateStock> = records.into_iter().map(TemplateStock::from).collect();
        let keyword = filter.keyword_or_empty().to_string();

        StockPageContext {
            page_data: PageData {
                items: items.clone(),
                total: window.total,
                page: window.page,
                size: window.size,
                total_pages: window.total_pages,
                has_prev: window.has_prev,
                has_next: window.has_next,
                category_id: filter.category_id,
                keyword: keyword.clone(),
                error: None,
            },
            page_info: PageInfo::from(window),
            stocks: items.clone(),
            items,
            categories,
            category_id: filter.category_id,
            keyword,
            year,
        }
    }

    /// Builds the empty page shown when the listing query failed.
    ///
    /// Zero items, `total = 0`, `totalPages = 1`, no categories, and the
    /// message in `pageData.error`.
    pub fn degraded(
        window: &PageWindow,
        filter: &StockFilter,
        year: i32,
        error: impl Into<String>,
    ) -> Self {
        let mut context = StockPageContext::new(window, Vec::new(), Vec::new(), filter, year);
        context.page_data.error = Some(error.into());
        context
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pager::{PageNumbering, Pager};
    use serde_json::json;

    fn record(id: i64, name: &str, category_name: Option<&str>) -> StockRecord {
        StockRecord {
            id,
            name: name.to_string(),
            inventory: 5,
            category_id: 1,
            category_name: category_name.map(str::to_string),
        }
    }

    #[test]
    fn test_api_item_keeps_missing_category_as_null() {
        let item = StockItem::from(record(7, "Orphan", None));
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(
            value,
            json!({
                "id": 7,
                "name": "Orphan",
                "inventory": 5,
                "category_id": 1,
                "category_name": null
            })
        );
    }

    #[test]
    fn test_list_response_shape() {
        let window = Pager::new(PageNumbering::OneBased, 100)
            .window(2, 1, 3)
            .unwrap();
        let response = StockListResponse::new(&window, vec![record(2, "Cola", Some("Drinks"))]);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["page"], 2);
        assert_eq!(value["total_pages"], 3);
        assert_eq!(value["items"][0]["category_name"], "Drinks");
    }

    #[test]
    fn test_template_context_fills_legacy_and_new_fields() {
        let window = Pager::new(PageNumbering::ZeroBased, 100)
            .window(0, 2, 3)
            .unwrap();
        let filter = StockFilter::new(Some(1), Some(" co "));
        let context = StockPageContext::new(
            &window,
            vec![record(3, "Cola", Some("Drinks")), record(2, "Cocoa", Some("Drinks"))],
            vec![Category {
                id: 1,
                name: "Drinks".to_string(),
            }],
            &filter,
            2026,
        );
        let value = serde_json::to_value(&context).unwrap();

        // New shape
        assert_eq!(value["pageData"]["total"], 3);
        assert_eq!(value["pageData"]["totalPages"], 2);
        assert_eq!(value["pageData"]["hasNext"], true);
        assert_eq!(value["pageData"]["keyword"], "co");
        assert_eq!(value["pageData"]["items"][0]["categoryName"], "Drinks");
        assert!(value["pageData"].get("error").is_none());

        // Legacy shape agrees with the new one
        assert_eq!(value["pageInfo"]["totalPages"], value["pageData"]["totalPages"]);
        assert_eq!(value["pageInfo"]["hasPrev"], false);
        assert_eq!(value["stocks"], value["pageData"]["items"]);
        assert_eq!(value["items"], value["pageData"]["items"]);

        assert_eq!(value["categoryId"], 1);
        assert_eq!(value["categories"][0]["name"], "Drinks");
        assert_eq!(value["year"], 2026);
    }

    #[test]
    fn test_degraded_context_is_empty_and_well_formed() {
        let window = PageWindow::empty(PageNumbering::ZeroBased, 20);
        let filter = StockFilter::new(None, Some("cola"));
        let context = StockPageContext::degraded(&window, &filter, 2026, "database unavailable");

        assert!(context.stocks.is_empty());
        assert!(context.page_data.items.is_empty());
        assert_eq!(context.page_data.total, 0);
        assert_eq!(context.page_info.total_pages, 1);
        assert!(!context.page_info.has_next);
        assert_eq!(context.keyword, "cola");
        assert_eq!(context.page_data.error.as_deref(), Some("database unavailable"));
    }
}
