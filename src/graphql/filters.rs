//! GraphQL filter, pagination and sort inputs, and their mapping onto the
//! canonical [QueryOptions] consumed by the family service.
//!
//! Every field is optional. Presence is "set vs. absent": an explicitly empty
//! string is forwarded as `Some("")` and left to the repository to interpret.

use async_graphql::{Enum, InputObject};

use crate::domain::{
    DEFAULT_PAGE_SIZE, FilterOptions, MAX_PAGE_SIZE, Pagination, QueryOptions, SortOptions,
};

/// Filter for parent lists
#[derive(InputObject, Default, Clone, Debug)]
pub struct ParentFilter {
    /// First name contains (case-insensitive)
    pub first_name: Option<String>,
    /// Last name contains (case-insensitive)
    pub last_name: Option<String>,
    /// Email contains (case-insensitive)
    pub email: Option<String>,
    /// Minimum age in years (inclusive)
    pub min_age: Option<i32>,
    /// Maximum age in years (inclusive)
    pub max_age: Option<i32>,
}

/// Filter for child lists
#[derive(InputObject, Default, Clone, Debug)]
pub struct ChildFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
}

#[derive(InputObject, Default, Clone, Debug)]
pub struct PaginationInput {
    /// Zero-based page index (default 0)
    pub page: Option<i32>,
    /// Items per page (default 10, max 100)
    pub page_size: Option<i32>,
}

#[derive(InputObject, Clone, Debug)]
pub struct SortInput {
    /// Field to sort by, e.g. `firstName`, `lastName`, `birthDate`, `createdAt`
    pub field: String,
    /// Sort direction (default ascending)
    pub direction: Option<SortDirection>,
}

/// Order direction for sorting
#[derive(Enum, Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum SortDirection {
    /// Ascending order (A-Z, 1-9, oldest-newest)
    #[default]
    Asc,
    /// Descending order (Z-A, 9-1, newest-oldest)
    Desc,
}

impl SortDirection {
    /// Wire form used at the family service boundary
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

fn non_negative(value: Option<i32>) -> Option<u32> {
    value.map(|v| v.max(0) as u32)
}

impl From<ParentFilter> for FilterOptions {
    fn from(filter: ParentFilter) -> Self {
        Self {
            first_name: filter.first_name,
            last_name: filter.last_name,
            email: filter.email,
            min_age: non_negative(filter.min_age),
            max_age: non_negative(filter.max_age),
        }
    }
}

impl From<ChildFilter> for FilterOptions {
    fn from(filter: ChildFilter) -> Self {
        Self {
            first_name: filter.first_name,
            last_name: filter.last_name,
            email: None,
            min_age: non_negative(filter.min_age),
            max_age: non_negative(filter.max_age),
        }
    }
}

/// Resolve pagination input against defaults: page 0, page size 10.
/// Negative values clamp to zero and page size is capped at 100.
pub fn to_pagination(input: Option<PaginationInput>) -> Pagination {
    let input = input.unwrap_or_default();
    let page = non_negative(input.page).unwrap_or(0);
    let page_size = non_negative(input.page_size)
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(MAX_PAGE_SIZE);
    Pagination::new(page, page_size)
}

pub fn to_sort(input: Option<SortInput>) -> Option<SortOptions> {
    input.map(|s| SortOptions::new(s.field, s.direction.unwrap_or_default().as_str()))
}

pub fn to_query_options<F>(
    filter: Option<F>,
    pagination: Option<PaginationInput>,
    sort: Option<SortInput>,
) -> QueryOptions
where
    F: Into<FilterOptions>,
{
    QueryOptions {
        pagination: to_pagination(pagination),
        filter: filter.map(Into::into).unwrap_or_default(),
        sort: to_sort(sort),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_when_absent() {
        let options = to_query_options::<ParentFilter>(None, None, None);
        assert_eq!(options.pagination, Pagination::new(0, 10));
        assert_eq!(options.filter, FilterOptions::default());
        assert_eq!(options.sort, None);
    }

    #[test]
    fn test_partial_pagination() {
        let p = to_pagination(Some(PaginationInput {
            page: Some(3),
            page_size: None,
        }));
        assert_eq!(p, Pagination::new(3, 10));

        let p = to_pagination(Some(PaginationInput {
            page: None,
            page_size: Some(25),
        }));
        assert_eq!(p, Pagination::new(0, 25));
    }

    #[test]
    fn test_clamping() {
        let p = to_pagination(Some(PaginationInput {
            page: Some(-4),
            page_size: Some(-1),
        }));
        assert_eq!(p, Pagination::new(0, DEFAULT_PAGE_SIZE));

        let p = to_pagination(Some(PaginationInput {
            page: Some(0),
            page_size: Some(5000),
        }));
        assert_eq!(p.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_sort_direction_serialization() {
        let sort = to_sort(Some(SortInput {
            field: "lastName".into(),
            direction: Some(SortDirection::Desc),
        }))
        .unwrap();
        assert_eq!(sort, SortOptions::new("lastName", "desc"));

        let sort = to_sort(Some(SortInput {
            field: "lastName".into(),
            direction: None,
        }))
        .unwrap();
        assert_eq!(sort.direction, "asc");
    }

    #[test]
    fn test_empty_string_is_kept_distinct_from_absent() {
        let options = to_query_options(
            Some(ParentFilter {
                first_name: Some(String::new()),
                ..Default::default()
            }),
            None,
            None,
        );
        assert_eq!(options.filter.first_name, Some(String::new()));
        assert_eq!(options.filter.last_name, None);
    }

    #[test]
    fn test_child_filter_never_filters_email() {
        let filter: FilterOptions = ChildFilter {
            first_name: Some("Jane".into()),
            min_age: Some(-3),
            ..Default::default()
        }
        .into();
        assert_eq!(filter.email, None);
        assert_eq!(filter.min_age, Some(0));
    }
}
