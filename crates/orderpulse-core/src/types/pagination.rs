//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u64 = 20;
/// Maximum page size. Larger requests are clamped to this value.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Validated parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
}

impl PageRequest {
    /// Validate raw caller input.
    ///
    /// Non-positive values are rejected with `InvalidArgument`; a page size
    /// above [`MAX_PAGE_SIZE`] is clamped. The resulting offset always fits
    /// in an `i64`.
    pub fn try_new(page: i64, page_size: i64) -> Result<Self, AppError> {
        if page < 1 {
            return Err(AppError::invalid_argument(format!(
                "page must be a positive integer, got {page}"
            )));
        }
        if page_size < 1 {
            return Err(AppError::invalid_argument(format!(
                "page size must be a positive integer, got {page_size}"
            )));
        }
        let page_size = page_size.min(MAX_PAGE_SIZE as i64);
        if (page - 1).checked_mul(page_size).is_none() {
            return Err(AppError::invalid_argument(format!(
                "page {page} is beyond the last addressable page"
            )));
        }
        Ok(Self {
            page: page as u64,
            page_size: page_size as u64,
        })
    }

    /// Calculate the SQL `OFFSET` value.
    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1)).saturating_mul(self.page_size)
    }

    /// Return the SQL `LIMIT` value.
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T: Serialize> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Current page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl<T: Serialize> PageResponse<T> {
    /// Create a new paginated response.
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            total_items,
            total_pages: total_items.div_ceil(request.page_size),
        }
    }
}
