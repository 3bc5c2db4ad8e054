//! Canonical list-query options and paged results exchanged with the
//! family service and repository ports.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    /// Build a pagination value, substituting the default for a zero page size.
    pub fn new(page: u32, page_size: u32) -> Self {
        let page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        Self { page, page_size }
    }

    /// Offset of the first item on this page.
    pub fn start(&self) -> usize {
        self.page as usize * self.page_size as usize
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

/// Optional filter fields; `None` means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOptions {
    pub field: String,
    /// Either `"asc"` or `"desc"`.
    pub direction: String,
}

impl SortOptions {
    pub fn new(field: impl Into<String>, direction: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: direction.into(),
        }
    }

    pub fn is_descending(&self) -> bool {
        self.direction.eq_ignore_ascii_case("desc")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOptions {
    pub pagination: Pagination,
    pub filter: FilterOptions,
    pub sort: Option<SortOptions>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedResult {
    pub total_count: usize,
    pub page: u32,
    pub page_size: u32,
    pub has_next: bool,
}

impl PagedResult {
    /// Describe one page of `returned` items out of `total_count` matches.
    pub fn new(pagination: Pagination, returned: usize, total_count: usize) -> Self {
        Self {
            total_count,
            page: pagination.page,
            page_size: pagination.page_size,
            has_next: pagination.start() + returned < total_count,
        }
    }
}

/// Clamp a page window to `len` items, returning the `start..end` range.
pub fn page_bounds(pagination: Pagination, len: usize) -> std::ops::Range<usize> {
    let start = pagination.start().min(len);
    let end = start.saturating_add(pagination.page_size as usize).min(len);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_page_size_uses_default() {
        assert_eq!(Pagination::new(3, 0).page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(Pagination::default(), Pagination::new(0, 10));
    }

    #[test]
    fn test_page_bounds_clamp() {
        assert_eq!(page_bounds(Pagination::new(0, 10), 25), 0..10);
        assert_eq!(page_bounds(Pagination::new(2, 10), 25), 20..25);
        assert_eq!(page_bounds(Pagination::new(5, 10), 25), 25..25);
        assert_eq!(page_bounds(Pagination::new(0, 10), 0), 0..0);
    }

    #[test]
    fn test_has_next() {
        let p = Pagination::new(1, 10);
        assert!(PagedResult::new(p, 10, 21).has_next);
        assert!(!PagedResult::new(p, 10, 20).has_next);
        assert!(!PagedResult::new(Pagination::new(9, 10), 0, 20).has_next);
    }

    #[test]
    fn test_sort_direction() {
        assert!(SortOptions::new("firstName", "desc").is_descending());
        assert!(!SortOptions::new("firstName", "asc").is_descending());
    }
}
