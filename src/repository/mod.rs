//! Outbound storage adapters.

pub mod memory;

pub use memory::{
    InMemoryChildRepository, InMemoryParentRepository, InMemoryRepositoryFactory,
    InMemoryTransactionManager,
};
