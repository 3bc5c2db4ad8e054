//! Reference implementations of the authorization port.
//!
//! Operation names follow `<entity>:<verb>`. Roles come from the principal
//! attached to the request context:
//!
//! | role     | verbs                                 |
//! |----------|---------------------------------------|
//! | `admin`  | all                                   |
//! | `editor` | `read`, `list`, `create`, `update`    |
//! | `viewer` | `read`, `list`                        |

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::domain::{DomainError, DomainResult};
use crate::ports::AuthorizationService;

const ENTITIES: &[&str] = &["parent", "child"];
const VERBS: &[&str] = &["read", "list", "create", "update", "delete"];

fn role_allows(role: &str, verb: &str) -> bool {
    match role.to_ascii_lowercase().as_str() {
        "admin" => true,
        "editor" => matches!(verb, "read" | "list" | "create" | "update"),
        "viewer" => matches!(verb, "read" | "list"),
        _ => false,
    }
}

/// Split `parent:read` into its parts, rejecting unknown operations.
fn parse_operation(operation: &str) -> DomainResult<(&str, &str)> {
    let (entity, verb) = operation.split_once(':').ok_or_else(|| {
        DomainError::Authorization(format!("malformed operation name {:?}", operation))
    })?;
    if !ENTITIES.contains(&entity) || !VERBS.contains(&verb) {
        return Err(DomainError::Authorization(format!(
            "unknown operation {:?}",
            operation
        )));
    }
    Ok((entity, verb))
}

/// Role-based authorizer backed by the request principal.
#[derive(Debug, Clone, Default)]
pub struct RoleAuthorizer;

#[async_trait]
impl AuthorizationService for RoleAuthorizer {
    async fn is_authorized(&self, ctx: &RequestContext, operation: &str) -> DomainResult<bool> {
        ctx.ensure_active()?;
        let (_, verb) = parse_operation(operation)?;

        let Some(principal) = ctx.principal() else {
            tracing::debug!(operation, "No principal on request; denying");
            return Ok(false);
        };

        let allowed = principal.roles.iter().any(|role| role_allows(role, verb));
        if !allowed {
            tracing::info!(
                subject = %principal.subject,
                operation,
                roles = ?principal.roles,
                "Authorization denied"
            );
        }
        Ok(allowed)
    }
}

/// Authorizer that permits every operation. Used when auth is disabled.
#[derive(Debug, Clone, Default)]
pub struct AllowAllAuthorizer;

#[async_trait]
impl AuthorizationService for AllowAllAuthorizer {
    async fn is_authorized(&self, ctx: &RequestContext, _operation: &str) -> DomainResult<bool> {
        ctx.ensure_active()?;
        Ok(true)
    }
}
