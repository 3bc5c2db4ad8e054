//! GraphQL schema definition with queries and mutations
//!
//! Every field requires a [RequestContext](crate::context::RequestContext) in
//! the request data and is gated by the authorization port.

use std::sync::Arc;

use async_graphql::extensions::Tracing;
use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::ports::{AuthorizationService, FamilyService};

use super::mutations::{ChildMutations, ParentMutations};
use super::queries::{ChildQueries, ParentQueries};

/// The GraphQL schema type
pub type FamilySchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(MergedObject, Default)]
pub struct QueryRoot(ParentQueries, ChildQueries);

#[derive(MergedObject, Default)]
pub struct MutationRoot(ParentMutations, ChildMutations);

/// Query depth and complexity limits applied to the schema
#[derive(Debug, Clone, Copy)]
pub struct SchemaLimits {
    pub max_depth: usize,
    pub max_complexity: usize,
}

impl Default for SchemaLimits {
    fn default() -> Self {
        Self {
            max_depth: 10,
            max_complexity: 200,
        }
    }
}

/// Build the GraphQL schema with all resolvers
pub fn build_schema(
    family_service: Arc<dyn FamilyService>,
    authorizer: Arc<dyn AuthorizationService>,
    limits: SchemaLimits,
) -> FamilySchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(family_service)
    .data(authorizer)
    .limit_depth(limits.max_depth)
    .limit_complexity(limits.max_complexity)
    .extension(Tracing)
    .finish()
}
