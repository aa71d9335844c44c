//! # Repository Module
//!
//! Database repository implementations for Stockroom.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories Inside a Session                        │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  let mut session = db.session().await?;                        │
//! │       │  session.stocks().page(&filter, limit, offset)                 │
//! │       ▼                                                                 │
//! │  StockRepository<'_>  (borrows the session's connection)               │
//! │  ├── count(&filter)            ┐                                        │
//! │  ├── page(&filter, ..)         ┘── same WHERE via filter.rs            │
//! │  ├── get(id)                                                           │
//! │  ├── insert(..) / update(..) / delete(id)                              │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database (inside the session's transaction)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CategoryRepository`](category::CategoryRepository) - Category CRUD and listing
//! - [`StockRepository`](stock::StockRepository) - Stock CRUD and filtered paging
//! - [`filter`] - Listing predicates shared by count and page queries

pub mod category;
pub mod filter;
pub mod stock;
