//! GraphQL authentication and authorization
//!
//! Bearer tokens are verified at the HTTP edge and turned into a
//! [Principal] on the [RequestContext]. Inside resolvers, [RequestContextExt]
//! fetches that context and [authorize] asks the authorization port whether
//! the caller may perform a named operation.

use std::sync::Arc;

use async_graphql::{Context, Result};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

use crate::context::{Principal, RequestContext};
use crate::domain::DomainError;
use crate::ports::AuthorizationService;

/// Claims accepted in access tokens. Either `roles` or a single `role`
/// may be present.
#[derive(Debug, Deserialize)]
struct AccessTokenClaims {
    sub: String,
    email: Option<String>,
    #[serde(default)]
    roles: Vec<String>,
    role: Option<String>,
    #[allow(dead_code)]
    exp: i64,
}

/// Verify an HS256 JWT and extract the caller
pub fn verify_token(token: &str, secret: &str) -> Result<Principal, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.validate_aud = false;

    let token_data = decode::<AccessTokenClaims>(
        token,
        &DecodingKey::from_secret(secret.trim().as_bytes()),
        &validation,
    )?;

    let claims = token_data.claims;
    let mut roles = claims.roles;
    if let Some(role) = claims.role
        && !roles.contains(&role)
    {
        roles.push(role);
    }

    tracing::debug!(subject = %claims.sub, ?roles, "JWT verified");

    Ok(Principal {
        subject: claims.sub,
        email: claims.email,
        roles,
    })
}

/// Extension trait to get the request context from GraphQL context
pub trait RequestContextExt {
    /// The request context, or a `nil context` error when none was attached.
    /// A cancelled request fails with `context canceled`.
    fn request_context(&self) -> Result<&RequestContext>;
}

impl<'a> RequestContextExt for Context<'a> {
    fn request_context(&self) -> Result<&RequestContext> {
        let req = self
            .data_opt::<RequestContext>()
            .ok_or_else(|| async_graphql::Error::new(DomainError::MissingContext.to_string()))?;
        if req.is_cancelled() {
            return Err(async_graphql::Error::new(DomainError::Cancelled.to_string()));
        }
        Ok(req)
    }
}

/// Check `operation` (e.g. `parent:read`) against the authorization port.
///
/// A failed check surfaces as `failed to check authorization: <cause>`; a
/// denial as `not authorized to <action>`, where `action` reads like
/// `read parent` or `list parents`.
pub async fn authorize(
    ctx: &Context<'_>,
    req: &RequestContext,
    operation: &str,
    action: &str,
) -> Result<()> {
    let authorizer = ctx.data::<Arc<dyn AuthorizationService>>()?;

    let allowed = authorizer
        .is_authorized(req, operation)
        .await
        .map_err(|e| {
            tracing::error!(operation, error = %e, "Authorization check failed");
            async_graphql::Error::new(format!("failed to check authorization: {}", e))
        })?;

    if !allowed {
        tracing::info!(
            request_id = %req.request_id(),
            operation,
            "Operation not authorized"
        );
        return Err(async_graphql::Error::new(format!(
            "not authorized to {}",
            action
        )));
    }
    Ok(())
}
