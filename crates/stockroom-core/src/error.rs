//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── CoreError        - Domain rule violations (missing, duplicate)    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stockroom-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  stockroom-api errors (in app)                                         │
//! │  └── ApiError         - What HTTP clients see (status + JSON body)     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → HTTP response          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain errors raised by the CRUD handlers.
///
/// Each variant lands in exactly one client-visible class: not-found,
/// conflict, invalid reference, or validation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Category id does not exist.
    #[error("Category not found: {0}")]
    CategoryNotFound(i64),

    /// Stock id does not exist.
    #[error("Stock not found: {0}")]
    StockNotFound(i64),

    /// Another category already uses this exact name.
    #[error("Category name '{0}' already exists")]
    DuplicateCategoryName(String),

    /// Category still owns stocks and cannot be deleted.
    ///
    /// ## When This Occurs
    /// ```text
    /// DELETE /api/categories/3
    ///      │
    ///      ▼
    /// count(stocks where category_id = 3) = 12
    ///      │
    ///      ▼
    /// CategoryInUse { id: 3, stocks: 12 }  → 409, nothing deleted
    /// ```
    #[error("Category {id} still has {stocks} stock item(s)")]
    CategoryInUse { id: i64, stocks: i64 },

    /// A stock write referenced a category that does not exist.
    #[error("Invalid category_id: {0}")]
    UnknownCategory(i64),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// They are never corrected silently (page clamping is the one exception,
/// and it lives in [`crate::pager`]).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Numeric value is below its lower bound (no upper bound).
    #[error("{field} must be at least {min}")]
    TooSmall { field: String, min: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::CategoryInUse { id: 3, stocks: 12 };
        assert_eq!(err.to_string(), "Category 3 still has 12 stock item(s)");

        let err = CoreError::DuplicateCategoryName("Drinks".to_string());
        assert_eq!(err.to_string(), "Category name 'Drinks' already exists");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::OutOfRange {
            field: "size".to_string(),
            min: 1,
            max: 100,
        };
        assert_eq!(err.to_string(), "size must be between 1 and 100");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
