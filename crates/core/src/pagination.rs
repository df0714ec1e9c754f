//! Pagination defaults, clamp helpers, and the page envelope.

use serde::Serialize;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum number of rows per page, regardless of what was requested.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided page number; absent or non-positive means page 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// One page of results plus the metadata needed to request the next.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub limit: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    /// Build a page envelope. `limit` must already be clamped to >= 1.
    pub fn new(items: Vec<T>, page: i64, limit: i64, total_items: i64) -> Self {
        let total_pages = if total_items == 0 {
            0
        } else {
            (total_items + limit - 1) / limit
        };
        Self {
            items,
            page,
            limit,
            total_items,
            total_pages,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
