//! Domain entities, query options and validation rules.

mod child;
mod error;
mod parent;
pub mod query;
pub mod validation;

pub use child::Child;
pub use error::{DomainError, DomainResult};
pub use parent::Parent;
pub use query::{
    DEFAULT_PAGE_SIZE, FilterOptions, MAX_PAGE_SIZE, PagedResult, Pagination, QueryOptions,
    SortOptions,
};
