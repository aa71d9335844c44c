//! # Validation Module
//!
//! Input validation utilities for Stockroom.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractors (axum)                                       │
//! │  └── Type validation (JSON / query deserialization)                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Trimming, emptiness, length limits                                │
//! │  └── Numeric bounds (inventory, page size)                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE (categories.name)                                          │
//! │  └── FOREIGN KEY (stocks.category_id)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::validation::{validate_category_name, validate_page_size};
//!
//! // Names are trimmed before they are checked and stored
//! assert_eq!(validate_category_name("  Drinks ").unwrap(), "Drinks");
//!
//! // Page size is rejected, never clamped
//! assert!(validate_page_size(0, 100).is_err());
//! ```

use crate::error::ValidationError;
use crate::{CATEGORY_NAME_MAX_LEN, STOCK_NAME_MAX_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Checks a trimmed name against emptiness and a character limit.
fn validate_name(field: &str, name: &str, max: usize) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    // Limits are in characters, not bytes (names are often non-ASCII)
    if name.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(name.to_string())
}

/// Validates a category name.
///
/// ## Rules
/// - Leading/trailing whitespace is removed
/// - Must not be empty after trimming
/// - At most 50 characters
///
/// ## Returns
/// The trimmed name, which is what gets stored and compared for duplicates.
pub fn validate_category_name(name: &str) -> ValidationResult<String> {
    validate_name("name", name, CATEGORY_NAME_MAX_LEN)
}

/// Validates a stock name.
///
/// ## Rules
/// - Leading/trailing whitespace is removed
/// - Must not be empty after trimming
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_stock_name;
///
/// assert!(validate_stock_name("Sparkling Water 500ml").is_ok());
/// assert!(validate_stock_name("   ").is_err());
/// ```
pub fn validate_stock_name(name: &str) -> ValidationResult<String> {
    validate_name("name", name, STOCK_NAME_MAX_LEN)
}

/// Normalizes a search keyword.
///
/// Returns `None` when the keyword is absent or blank, so that
/// "no keyword" and "whitespace keyword" both mean "no name filter".
pub fn normalize_keyword(keyword: Option<&str>) -> Option<String> {
    keyword
        .map(str::trim)
        .filter(|kw| !kw.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an inventory count.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (out of stock)
pub fn validate_inventory(inventory: i64) -> ValidationResult<()> {
    if inventory < 0 {
        return Err(ValidationError::TooSmall {
            field: "inventory".to_string(),
            min: 0,
        });
    }

    Ok(())
}

/// Validates a caller-supplied page size.
///
/// ## Rules
/// - `1 <= size <= max`
/// - Out-of-range sizes are rejected; unlike page numbers they are not clamped
///
/// ## Arguments
/// * `size` - Requested number of rows per page
/// * `max` - Upper bound for the calling endpoint (100 for stocks, 200 for categories)
pub fn validate_page_size(size: i64, max: i64) -> ValidationResult<()> {
    if size < 1 || size > max {
        return Err(ValidationError::OutOfRange {
            field: "size".to_string(),
            min: 1,
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
