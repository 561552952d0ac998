//! Page-based pagination primitives shared by list endpoints.
//!
//! Handlers accept a [`PageRequest`] (one-based `page` plus `limit`), adapters
//! translate it into `OFFSET`/`LIMIT` clauses, and responses carry a
//! [`PageMeta`] block alongside the page items in a [`Paginated`] envelope.
//!
//! ```
//! use pagination::{PageRequest, Paginated};
//!
//! let request = PageRequest::new(Some(2), Some(10)).expect("valid page request");
//! assert_eq!(request.offset(), 10);
//!
//! let page = Paginated::new(vec!["a", "b"], request, 12);
//! assert_eq!(page.meta.total_pages, 2);
//! ```

use serde::{Deserialize, Serialize};

/// Page used when the client omits `page`.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the client omits `limit`.
pub const DEFAULT_LIMIT: u32 = 20;
/// Upper bound for client-supplied page sizes.
pub const MAX_LIMIT: u32 = 100;

/// Validation failures raised when constructing a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Pages are one-based.
    #[error("page must be at least 1, got {page}")]
    PageOutOfRange {
        /// Rejected page number.
        page: i64,
    },
    /// Limits must lie between 1 and [`MAX_LIMIT`].
    #[error("limit must be between 1 and {max}, got {limit}")]
    LimitOutOfRange {
        /// Rejected page size.
        limit: i64,
        /// Largest accepted page size.
        max: u32,
    },
}

/// Validated page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build a page request from optional raw query values.
    ///
    /// Missing values fall back to [`DEFAULT_PAGE`] and [`DEFAULT_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when `page` is below one or `limit` lies
    /// outside `1..=MAX_LIMIT`.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Result<Self, PageRequestError> {
        let page = match page {
            None => DEFAULT_PAGE,
            Some(raw) => u32::try_from(raw)
                .ok()
                .filter(|value| *value >= 1)
                .ok_or(PageRequestError::PageOutOfRange { page: raw })?,
        };
        let limit = match limit {
            None => DEFAULT_LIMIT,
            Some(raw) => u32::try_from(raw)
                .ok()
                .filter(|value| (1..=MAX_LIMIT).contains(value))
                .ok_or(PageRequestError::LimitOutOfRange {
                    limit: raw,
                    max: MAX_LIMIT,
                })?,
        };
        Ok(Self { page, limit })
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items preceding this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

/// Pagination metadata returned with every list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Total number of matching items across all pages.
    pub total: u64,
    /// One-based page number that was served.
    pub page: u32,
    /// Page size that was applied.
    pub limit: u32,
    /// Number of pages needed to hold `total` items.
    pub total_pages: u64,
}

impl PageMeta {
    /// Derive metadata for `request` given the total number of matches.
    ///
    /// ```
    /// use pagination::{PageMeta, PageRequest};
    ///
    /// let meta = PageMeta::new(PageRequest::default(), 41);
    /// assert_eq!(meta.total_pages, 3);
    /// ```
    #[must_use]
    pub const fn new(request: PageRequest, total: u64) -> Self {
        Self {
            total,
            page: request.page,
            limit: request.limit,
            total_pages: total.div_ceil(request.limit as u64),
        }
    }
}

/// Items of one page together with their pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items on the current page.
    pub items: Vec<T>,
    /// Metadata describing the page.
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    /// Wrap page items with metadata computed from `request` and `total`.
    #[must_use]
    pub const fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            meta: PageMeta::new(request, total),
        }
    }

    /// Transform the page items while keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for page validation and metadata arithmetic.

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_apply_when_values_are_missing() {
        let request = PageRequest::new(None, None).expect("defaults are valid");
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.page(), DEFAULT_PAGE);
        assert_eq!(request.limit(), DEFAULT_LIMIT);
        assert_eq!(request.offset(), 0);
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    fn rejects_pages_below_one(#[case] page: i64) {
        let err = PageRequest::new(Some(page), None).expect_err("page must be rejected");
        assert_eq!(err, PageRequestError::PageOutOfRange { page });
    }

    #[rstest]
    #[case(0)]
    #[case(101)]
    #[case(-1)]
    fn rejects_limits_outside_bounds(#[case] limit: i64) {
        let err = PageRequest::new(None, Some(limit)).expect_err("limit must be rejected");
        assert_eq!(
            err,
            PageRequestError::LimitOutOfRange {
                limit,
                max: MAX_LIMIT
            }
        );
    }

    #[rstest]
    #[case(1, 20, 0)]
    #[case(3, 10, 20)]
    #[case(2, 100, 100)]
    fn offset_skips_previous_pages(#[case] page: i64, #[case] limit: i64, #[case] offset: u64) {
        let request = PageRequest::new(Some(page), Some(limit)).expect("valid request");
        assert_eq!(request.offset(), offset);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(20, 1)]
    #[case(21, 2)]
    fn total_pages_rounds_up(#[case] total: u64, #[case] expected: u64) {
        let meta = PageMeta::new(PageRequest::default(), total);
        assert_eq!(meta.total_pages, expected);
    }

    #[rstest]
    fn meta_serialises_with_camel_case_keys() {
        let meta = PageMeta::new(PageRequest::default(), 5);
        let value = serde_json::to_value(meta).expect("meta serialises");
        assert_eq!(
            value,
            serde_json::json!({"total": 5, "page": 1, "limit": 20, "totalPages": 1})
        );
    }

    #[rstest]
    fn map_preserves_metadata() {
        let page = Paginated::new(vec![1, 2, 3], PageRequest::default(), 3);
        let mapped = page.map(|value| value * 2);
        assert_eq!(mapped.items, vec![2, 4, 6]);
        assert_eq!(mapped.meta.total, 3);
    }
}
