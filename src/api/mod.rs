//! HTTP route definitions
//!
//! The primary API is GraphQL at /graphql. `/health` reports liveness of the
//! service and its storage.

pub mod graphql;
pub mod health;
