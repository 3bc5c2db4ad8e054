//! Error taxonomy shared by the domain, the ports and their adapters.

use thiserror::Error;

/// Errors returned across the port boundaries.
///
/// Resolvers never match on these structurally; they embed the `Display`
/// text in a flat `failed to <action> <entity>: <cause>` message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("nil context")]
    MissingContext,

    #[error("context canceled")]
    Cancelled,

    #[error("authorization failed: {0}")]
    Authorization(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("transaction error: {0}")]
    Transaction(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn already_exists(entity: &'static str, id: impl ToString) -> Self {
        Self::AlreadyExists {
            entity,
            id: id.to_string(),
        }
    }

    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
