//! Page requests and paginated results

use serde::Serialize;

/// Bounds applied to every page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

const MAX_OFFSET: u64 = i64::MAX as u64;

/// A requested page, before clamping. `page` is 1-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PageRequest {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Apply defaults and clamp: `page >= 1`, `1 <= limit <= max_limit`.
    /// `page` is capped so the row offset still fits a SQL `OFFSET` (i64).
    pub fn resolve(self, limits: PageLimits) -> Page {
        let limit = self
            .limit
            .filter(|l| *l > 0)
            .unwrap_or(limits.default_limit)
            .min(limits.max_limit)
            .max(1);
        let page = self.page.unwrap_or(1).clamp(1, (MAX_OFFSET / limit).max(1));
        Page { page, limit }
    }
}

/// A resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u64,
    pub limit: u64,
}

impl Page {
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Pagination metadata, derived from `total` and the page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageInfo {
    pub fn new(page: Page, total: u64) -> Self {
        Self {
            page: page.page,
            limit: page.limit,
            total,
            total_pages: total.div_ceil(page.limit),
            has_next: page.page.saturating_mul(page.limit) < total,
            has_prev: page.page > 1,
        }
    }
}

/// One page of rows plus its metadata
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(rename = "pagination")]
    pub info: PageInfo,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, page: Page, total: u64) -> Self {
        Self {
            data,
            info: PageInfo::new(page, total),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            info: self.info,
        }
    }

    /// Swap the rows for an already-transformed set, keeping the metadata.
    pub fn with_data<U>(self, data: Vec<U>) -> Paginated<U> {
        Paginated {
            data,
            info: self.info,
        }
    }
}
