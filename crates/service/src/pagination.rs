//! Pagination utilities for service layer
//!
//! Provides a simple `Pagination` struct, the page envelope returned by list
//! operations, and helpers to normalize inputs.

use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: i64 = 7;
pub const MAX_LIMIT: i64 = 100;

/// Pagination parameters as received from the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    pub page: i64,
    /// items per page
    pub limit: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64) -> Self { Self { page, limit } }

    /// Clamp to `page >= 1` and `1 <= limit <= max_limit`.
    pub fn normalize(self, max_limit: i64) -> Self {
        let page = self.page.max(1);
        let limit = self.limit.clamp(1, max_limit.max(1));
        Self { page, limit }
    }

    /// Number of entries to skip, `(page - 1) * limit`, capped at `i64::MAX`
    /// since SQL OFFSET is bound as a signed 64-bit integer.
    pub fn skip(&self) -> u64 {
        let page = self.page.max(1) as u64;
        (page - 1).saturating_mul(self.limit.max(0) as u64).min(i64::MAX as u64)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, limit: DEFAULT_LIMIT } }
}

/// `ceil(total / limit)`; zero entries means zero pages.
pub fn total_pages(total_entries: u64, limit: i64) -> u64 {
    if limit <= 0 { return 0; }
    total_entries.div_ceil(limit as u64)
}

/// One page of a filtered listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_entries: u64,
    pub total_pages: u64,
    pub current_page: i64,
    pub entries: Vec<T>,
}
