//! # Stockroom API
//!
//! HTTP server for the stock inventory: a JSON API over categories and
//! stocks, plus a server-rendered stock listing page.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP request                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TraceLayer ──► Router ──► handler (routes/*)                           │
//! │                               │                                         │
//! │               ┌───────────────┼──────────────────┐                      │
//! │               ▼               ▼                  ▼                      │
//! │         Pager (core)    Session (db)      TemplateRenderer              │
//! │         page / size     repositories      (pages only)                  │
//! │               │               │                  │                      │
//! │               └───────────────┴──────────────────┘                      │
//! │                               │                                         │
//! │                               ▼                                         │
//! │              JSON / HTML, or ApiError { code, message }                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod render;
pub mod routes;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use stockroom_db::Database;

use crate::config::AppConfig;
use crate::render::{EmbeddedRenderer, TemplateRenderer};
use crate::routes::{categories, pages, stocks};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
    pub renderer: Arc<dyn TemplateRenderer>,
}

impl AppState {
    /// Creates state with the embedded page templates.
    pub fn new(db: Database, config: AppConfig) -> Self {
        Self::with_renderer(db, config, Arc::new(EmbeddedRenderer::new()))
    }

    /// Creates state with a custom renderer.
    pub fn with_renderer(
        db: Database,
        config: AppConfig,
        renderer: Arc<dyn TemplateRenderer>,
    ) -> Self {
        AppState {
            db,
            config: Arc::new(config),
            renderer,
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/health", get(pages::health))
        .route("/stocks", get(pages::stocks))
        .route("/api/stocks", get(stocks::list).post(stocks::create))
        .route("/api/stocks/search", get(stocks::list))
        .route(
            "/api/stocks/{id}",
            get(stocks::get)
                .put(stocks::update)
                .patch(stocks::update)
                .delete(stocks::delete),
        )
        .route(
            "/api/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/api/categories/{id}",
            get(categories::get)
                .patch(categories::update)
                .delete(categories::delete),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
