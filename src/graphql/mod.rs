//! GraphQL API: the inbound adapter.
//!
//! Each resolver follows the same pipeline: require the request context,
//! authorize the named operation, decode identifiers, call the family
//! service, and flatten any failure into a `failed to <action>: <cause>`
//! message.

pub mod auth;
pub mod filters;
pub(crate) mod helpers;
pub mod mutations;
pub mod pagination;
pub mod queries;
mod schema;
pub mod types;

pub use auth::{RequestContextExt, authorize, verify_token};
pub use schema::{FamilySchema, MutationRoot, QueryRoot, SchemaLimits, build_schema};
