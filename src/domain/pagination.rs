//! Pagination engine.
//!
//! A `PageWindow` is computed once from caller input and then realized in one
//! of two ways:
//!
//! - **ranged**: the hosted backend returns rows `range()` (inclusive) plus an
//!   exact total in the same round trip;
//! - **materialize-then-slice**: the gateway returns the full filtered list
//!   and `slice()` cuts the window locally.
//!
//! Both yield the same `Page` for the same ordered dataset.

use serde::{Deserialize, Serialize};

/// Smallest and largest accepted page sizes.
pub const MIN_PAGE_SIZE: u32 = 1;
pub const MAX_PAGE_SIZE: u32 = 24;

/// Page size used when the caller's value is not a number.
pub const DEFAULT_PAGE_SIZE: u32 = 9;

/// One page of results plus the size of the whole filtered set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Clamped offset/limit window for a page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page: u32,
    page_size: u32,
}

impl PageWindow {
    /// Clamps `page` to at least 1 and `page_size` into `[1, 24]`. Never fails.
    pub fn compute(page: i64, page_size: i64) -> Self {
        let page = page.clamp(1, u32::MAX as i64) as u32;
        let page_size = page_size.clamp(MIN_PAGE_SIZE as i64, MAX_PAGE_SIZE as i64) as u32;
        Self { page, page_size }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }

    /// Maximum number of rows in the page.
    pub fn limit(&self) -> u64 {
        self.page_size as u64
    }

    /// Inclusive row range `[offset, offset + limit - 1]` for ranged queries.
    pub fn range(&self) -> (u64, u64) {
        let from = self.offset();
        (from, from + self.limit() - 1)
    }

    /// Materialize-then-slice: cuts the window out of a full ordered list.
    pub fn slice<T>(&self, all: Vec<T>) -> Page<T> {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(self.offset().min(total) as usize)
            .take(self.limit() as usize)
            .collect();
        Page { items, total }
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::compute(1, DEFAULT_PAGE_SIZE as i64)
    }
}
