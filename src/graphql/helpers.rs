// Helper functions shared across GraphQL query/mutation modules.

use std::sync::Arc;

use async_graphql::{Context, Result};
use uuid::Uuid;

use crate::domain::DomainError;
use crate::identifier::parse_id;
use crate::ports::FamilyService;

/// The family service attached to the schema
pub(crate) fn family<'a>(ctx: &Context<'a>) -> Result<&'a Arc<dyn FamilyService>> {
    ctx.data::<Arc<dyn FamilyService>>()
}

/// Decode a string id, failing with `invalid <entity> ID: <cause>`
pub(crate) fn decode_id(raw: &str, entity: &str) -> Result<Uuid> {
    parse_id(raw).map_err(|e| async_graphql::Error::new(format!("invalid {} ID: {}", entity, e)))
}

/// Map a service error to `failed to <action>: <cause>`
pub(crate) fn failed(action: &'static str) -> impl Fn(DomainError) -> async_graphql::Error {
    move |e| {
        tracing::warn!(error = %e, "failed to {}", action);
        async_graphql::Error::new(format!("failed to {}: {}", action, e))
    }
}
