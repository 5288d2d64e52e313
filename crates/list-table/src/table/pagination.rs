//! Pagination state of a prepared table.

use crate::source::SortOrder;
use serde::Serialize;

/// Derived fresh for every request from the record source's counts plus the request's
/// page window. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u32,
    pub per_page: u32,
    pub orderby: String,
    pub order: SortOrder,
}

impl PaginationState {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.current_page) < self.total_pages
    }

    pub fn last_page(&self) -> u64 {
        self.total_pages.max(1)
    }
}
