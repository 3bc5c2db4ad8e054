//! Request-scoped context threaded explicitly through every port call.
//!
//! A [RequestContext] is built once per HTTP request and attached to the
//! GraphQL request data. Resolvers refuse to run without one, and every
//! downstream call checks its cancellation token before touching state.

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::DomainError;

/// Authenticated caller extracted from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
    pub email: Option<String>,
    pub roles: Vec<String>,
}

impl Principal {
    pub fn new(subject: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            subject: subject.into(),
            email: None,
            roles,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Uuid,
    cancel: CancellationToken,
    principal: Option<Principal>,
    in_transaction: bool,
}

impl RequestContext {
    pub fn new(principal: Option<Principal>) -> Self {
        Self::with_token(principal, CancellationToken::new())
    }

    pub fn with_token(principal: Option<Principal>, cancel: CancellationToken) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            cancel,
            principal,
            in_transaction: false,
        }
    }

    /// Context with no authenticated caller.
    pub fn anonymous() -> Self {
        Self::new(None)
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Fail fast if the request has been abandoned.
    pub fn ensure_active(&self) -> Result<(), DomainError> {
        if self.is_cancelled() {
            return Err(DomainError::Cancelled);
        }
        Ok(())
    }

    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    /// Derive a context carrying the transaction flag. Shares the
    /// cancellation token and principal with `self`.
    pub fn with_transaction(&self, active: bool) -> Self {
        Self {
            in_transaction: active,
            ..self.clone()
        }
    }
}
