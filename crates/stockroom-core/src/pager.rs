//! # Pager
//!
//! Turns a `(page, size)` request plus a total row count into an
//! offset/limit slice and the metadata listing views need.
//!
//! ## Numbering Conventions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                total = 45, size = 20  →  3 pages                        │
//! │                                                                         │
//! │   rows:    [ 0 ........ 19 ][ 20 ........ 39 ][ 40 .. 44 ]              │
//! │                                                                         │
//! │   ZeroBased:     page 0           page 1          page 2                │
//! │   OneBased:      page 1           page 2          page 3                │
//! │                                                                         │
//! │   offset = (page - first_page) * size                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each endpoint picks exactly one convention: the rendered listing page is
//! zero-based, the JSON API is one-based.
//!
//! ## Clamping Rules
//! - `total_pages` is never below 1, so an empty result is "page 1 of 1"
//! - A page past the last page is clamped to the last page (both conventions)
//! - A page before the first page is a validation error
//! - An out-of-range size is a validation error, never clamped

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validation::{validate_page_size, ValidationResult};

// =============================================================================
// Page Numbering
// =============================================================================

/// Which number names the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageNumbering {
    /// `page=0` is the first page.
    ZeroBased,
    /// `page=1` is the first page.
    OneBased,
}

impl PageNumbering {
    /// Returns the number of the first page.
    #[inline]
    pub const fn first_page(self) -> i64 {
        match self {
            PageNumbering::ZeroBased => 0,
            PageNumbering::OneBased => 1,
        }
    }
}

/// Number of pages needed for `total` rows at `size` rows per page.
///
/// Returns at least 1 so that UIs never render "page 0 of 0".
///
/// ## Example
/// ```rust
/// use stockroom_core::pager::total_pages;
///
/// assert_eq!(total_pages(0, 20), 1);
/// assert_eq!(total_pages(20, 20), 1);
/// assert_eq!(total_pages(21, 20), 2);
/// ```
pub fn total_pages(total: i64, size: i64) -> i64 {
    if total <= 0 || size <= 0 {
        return 1;
    }
    (total + size - 1) / size
}

// =============================================================================
// Page Window
// =============================================================================

/// The resolved slice of a listing: which rows to fetch and how to describe
/// the page to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub numbering: PageNumbering,
    /// Clamped page number, in the endpoint's numbering.
    pub page: i64,
    pub size: i64,
    /// Rows to skip (SQL `OFFSET`).
    pub offset: i64,
    /// Rows to fetch (SQL `LIMIT`).
    pub limit: i64,
    /// Total matching rows before slicing.
    pub total: i64,
    pub total_pages: i64,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PageWindow {
    /// An empty, well-formed window: zero rows, one page, no neighbours.
    ///
    /// Used by the listing page when its query fails.
    pub fn empty(numbering: PageNumbering, size: i64) -> Self {
        PageWindow {
            numbering,
            page: numbering.first_page(),
            size,
            offset: 0,
            limit: size,
            total: 0,
            total_pages: 1,
            has_prev: false,
            has_next: false,
        }
    }

    /// Number of the last page in this window's numbering.
    #[inline]
    pub fn last_page(&self) -> i64 {
        self.numbering.first_page() + self.total_pages - 1
    }
}

// =============================================================================
// Pager
// =============================================================================

/// Page arithmetic for one endpoint: a numbering convention and a size bound.
///
/// ## Usage
/// ```rust
/// use stockroom_core::pager::{PageNumbering, Pager};
///
/// let pager = Pager::new(PageNumbering::ZeroBased, 100);
///
/// // Validate early (before touching the database)...
/// pager.validate(0, 20).unwrap();
///
/// // ...then resolve the window once the total is known.
/// let window = pager.window(0, 20, 45).unwrap();
/// assert_eq!((window.offset, window.limit), (0, 20));
/// assert!(window.has_next);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    numbering: PageNumbering,
    max_size: i64,
}

impl Pager {
    /// Creates a pager with the given numbering and maximum page size.
    pub const fn new(numbering: PageNumbering, max_size: i64) -> Self {
        Pager {
            numbering,
            max_size,
        }
    }

    /// Returns the numbering convention.
    #[inline]
    pub const fn numbering(&self) -> PageNumbering {
        self.numbering
    }

    /// Returns the maximum accepted page size.
    #[inline]
    pub const fn max_size(&self) -> i64 {
        self.max_size
    }

    /// Checks the request without knowing the total.
    ///
    /// ## Errors
    /// - `page` below the first page
    /// - `size` outside `1..=max_size`
    pub fn validate(&self, page: i64, size: i64) -> ValidationResult<()> {
        let first = self.numbering.first_page();
        if page < first {
            return Err(ValidationError::TooSmall {
                field: "page".to_string(),
                min: first,
            });
        }

        validate_page_size(size, self.max_size)
    }

    /// Resolves the window for a request once the total row count is known.
    ///
    /// ## Arguments
    /// * `page` - Requested page in this pager's numbering
    /// * `size` - Requested rows per page
    /// * `total` - Number of rows matching the filters
    ///
    /// ## Returns
    /// The clamped window, or a validation error for malformed input.
    pub fn window(&self, page: i64, size: i64, total: i64) -> ValidationResult<PageWindow> {
        self.validate(page, size)?;

        let first = self.numbering.first_page();
        let total = total.max(0);
        let total_pages = total_pages(total, size);
        let last = first + total_pages - 1;
        let page = page.min(last);

        Ok(PageWindow {
            numbering: self.numbering,
            page,
            size,
            offset: (page - first) * size,
            limit: size,
            total,
            total_pages,
            has_prev: page > first,
            has_next: page < last,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_is_ceiling_with_floor_of_one() {
        for size in 1..=100 {
            for total in 0..=450 {
                let expected = if total == 0 {
                    1
                } else {
                    (total as f64 / size as f64).ceil() as i64
                };
                assert_eq!(
                    total_pages(total, size),
                    expected,
                    "total={total} size={size}"
                );
            }
        }
    }

    #[test]
    fn test_one_based_offsets() {
        let pager = Pager::new(PageNumbering::OneBased, 100);

        let first = pager.window(1, 20, 45).unwrap();
        assert_eq!((first.offset, first.limit), (0, 20));
        assert!(!first.has_prev);
        assert!(first.has_next);

        let second = pager.window(2, 20, 45).unwrap();
        assert_eq!(second.offset, 20);
        assert!(second.has_prev);
        assert!(second.has_next);

        let last = pager.window(3, 20, 45).unwrap();
        assert_eq!(last.offset, 40);
        assert!(last.has_prev);
        assert!(!last.has_next);
    }

    #[test]
    fn test_zero_based_offsets() {
        let pager = Pager::new(PageNumbering::ZeroBased, 100);

        let first = pager.window(0, 20, 45).unwrap();
        assert_eq!(first.offset, 0);
        assert!(!first.has_prev);

        let last = pager.window(2, 20, 45).unwrap();
        assert_eq!(last.offset, 40);
        assert_eq!(last.last_page(), 2);
        assert!(!last.has_next);
    }

    #[test]
    fn test_pages_beyond_last_are_clamped_in_both_conventions() {
        let one = Pager::new(PageNumbering::OneBased, 100)
            .window(99, 10, 25)
            .unwrap();
        assert_eq!(one.page, 3);
        assert_eq!(one.offset, 20);
        assert!(!one.has_next);

        let zero = Pager::new(PageNumbering::ZeroBased, 100)
            .window(99, 10, 25)
            .unwrap();
        assert_eq!(zero.page, 2);
        assert_eq!(zero.offset, 20);
        assert!(!zero.has_next);
    }

    #[test]
    fn test_empty_total_reports_single_page() {
        let window = Pager::new(PageNumbering::OneBased, 100)
            .window(5, 20, 0)
            .unwrap();

        assert_eq!(window.page, 1);
        assert_eq!(window.total_pages, 1);
        assert_eq!(window.offset, 0);
        assert!(!window.has_prev);
        assert!(!window.has_next);
    }

    #[test]
    fn test_page_below_first_is_rejected() {
        let one = Pager::new(PageNumbering::OneBased, 100);
        assert!(matches!(
            one.window(0, 20, 10),
            Err(ValidationError::TooSmall { min: 1, .. })
        ));

        let zero = Pager::new(PageNumbering::ZeroBased, 100);
        assert!(zero.window(-1, 20, 10).is_err());
        assert!(zero.window(0, 20, 10).is_ok());
    }

    #[test]
    fn test_size_out_of_bounds_is_rejected_not_clamped() {
        let pager = Pager::new(PageNumbering::OneBased, 100);
        assert!(pager.window(1, 0, 10).is_err());
        assert!(pager.window(1, 101, 10).is_err());

        let categories = Pager::new(PageNumbering::OneBased, 200);
        assert_eq!(categories.window(1, 200, 10).unwrap().limit, 200);
    }

    #[test]
    fn test_empty_window() {
        let window = PageWindow::empty(PageNumbering::ZeroBased, 20);
        assert_eq!(window.page, 0);
        assert_eq!(window.total, 0);
        assert_eq!(window.total_pages, 1);
        assert!(!window.has_prev && !window.has_next);
    }
}
