//! Rendered pages and the health probe.
//!
//! `/stocks` never answers with a database error: if the listing query
//! fails it renders an empty page with the message in `pageData.error`.
//! Bad `page`/`size` values are still a 422.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use chrono::{Datelike, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use stockroom_core::normalize::StockPageContext;
use stockroom_core::{PageNumbering, PageWindow, Pager, StockFilter, MAX_STOCK_PAGE_SIZE};

use super::{fetch_stock_page, resolve_page, StockListParams};
use crate::error::ApiError;
use crate::render::{INDEX_TEMPLATE, STOCKS_TEMPLATE};
use crate::AppState;

/// Pager of the listing page: pages start at 0.
const PAGE_PAGER: Pager = Pager::new(PageNumbering::ZeroBased, MAX_STOCK_PAGE_SIZE);

/// Message shown on the listing page when its query fails.
const LISTING_FAILED: &str = "Stock list is temporarily unavailable.";

/// `GET /`.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let context = json!({
        "title": state.config.app_name,
        "year": Utc::now().year(),
    });
    render(&state, INDEX_TEMPLATE, context)
}

/// `GET /stocks`.
pub async fn stocks(
    State(state): State<AppState>,
    params: Result<Query<StockListParams>, QueryRejection>,
) -> Result<Html<String>, ApiError> {
    let Query(params) = params?;
    let (page, size) = resolve_page(
        &PAGE_PAGER,
        params.page,
        params.size,
        state.config.default_page_size,
    )?;
    let filter = params.filter();
    let year = Utc::now().year();

    let context = match load_listing(&state, &filter, page, size, year).await {
        Ok(context) => context,
        Err(err) => {
            warn!(error = %err, "Stock listing failed, rendering empty page");
            let window = PageWindow::empty(PAGE_PAGER.numbering(), size);
            StockPageContext::degraded(&window, &filter, year, LISTING_FAILED)
        }
    };

    let mut value = serde_json::to_value(&context).map_err(|e| ApiError::internal(e.to_string()))?;
    if let Some(fields) = value.as_object_mut() {
        fields.insert("title".to_string(), Value::from(state.config.app_name.clone()));
    }

    render(&state, STOCKS_TEMPLATE, value)
}

async fn load_listing(
    state: &AppState,
    filter: &StockFilter,
    page: i64,
    size: i64,
    year: i32,
) -> Result<StockPageContext, ApiError> {
    let mut session = state.db.session().await?;
    let (window, records) = fetch_stock_page(&mut session, &PAGE_PAGER, filter, page, size).await?;
    let categories = session.categories().list_by_name().await?;

    debug!(page = window.page, total = window.total, "Rendering stock page");
    Ok(StockPageContext::new(&window, records, categories, filter, year))
}

fn render(state: &AppState, template: &str, context: Value) -> Result<Html<String>, ApiError> {
    state
        .renderer
        .render(template, &context)
        .map(Html)
        .map_err(|e| ApiError::internal(e.to_string()))
}

// =============================================================================
// Health
// =============================================================================

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
}

/// `GET /health`: 200 when the database answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let healthy = state.db.health_check().await;
    let (status, body) = if healthy {
        (StatusCode::OK, ("ok", "up"))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, ("degraded", "down"))
    };

    (
        status,
        Json(HealthStatus {
            status: body.0,
            database: body.1,
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

// =============================================================================
// Unit Tests
// =============================================================================
