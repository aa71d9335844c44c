//! # stockroom-core: Pure Domain Logic for Stockroom
//!
//! This crate holds the inventory domain as pure functions with zero I/O
//! dependencies: the two entities, their validation rules, the page/offset
//! arithmetic and the shaping of results for the JSON API and the rendered
//! listing page.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 stockroom-api (axum handlers)                   │   │
//! │  │    GET /stocks (HTML) ── GET /api/stocks (JSON) ── CRUD         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockroom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   pager   │  │ normalize │  │ validation│  │   │
//! │  │   │ Category  │  │PageWindow │  │ StockItem │  │   rules   │  │   │
//! │  │   │  Stock    │  │ numbering │  │ PageData  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockroom-db (Database Layer)                   │   │
//! │  │        SQLite, query builder, repositories, migrations          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities and write payloads (Category, Stock, patches)
//! - [`pager`] - Page numbering conventions and offset/limit arithmetic
//! - [`normalize`] - API and template output shapes
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::pager::{PageNumbering, Pager};
//!
//! // 45 matching stocks, 20 per page, 1-based numbering, page 9 requested
//! let pager = Pager::new(PageNumbering::OneBased, 100);
//! let window = pager.window(9, 20, 45).unwrap();
//!
//! // Out-of-range pages are clamped to the last page
//! assert_eq!(window.page, 3);
//! assert_eq!(window.offset, 40);
//! assert_eq!(window.total_pages, 3);
//! assert!(!window.has_next);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod normalize;
pub mod pager;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use pager::{PageNumbering, PageWindow, Pager};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a category name, in characters.
pub const CATEGORY_NAME_MAX_LEN: usize = 50;

/// Maximum length of a stock name, in characters.
pub const STOCK_NAME_MAX_LEN: usize = 200;

/// Page size used when a listing request does not specify one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Upper bound for the page size of stock listings (page and API).
pub const MAX_STOCK_PAGE_SIZE: i64 = 100;

/// Upper bound for the page size of the category listing.
pub const MAX_CATEGORY_PAGE_SIZE: i64 = 200;
