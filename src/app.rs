//! Application state and HTTP router construction.
//!
//! Used by `main` and by the HTTP integration tests to build the Axum app.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::Config;
use crate::graphql::{FamilySchema, build_schema};
use crate::ports::{AuthorizationService, RepositoryFactory, TransactionManager};
use crate::repository::{InMemoryRepositoryFactory, InMemoryTransactionManager};
use crate::services::{AllowAllAuthorizer, FamilyServiceImpl, RoleAuthorizer};

/// Shared state for HTTP handlers (GraphQL, health).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub schema: FamilySchema,
    pub repositories: Arc<dyn RepositoryFactory>,
}

impl AppState {
    /// Wire the family service over the given storage adapters.
    pub fn new(
        config: Config,
        repositories: Arc<dyn RepositoryFactory>,
        transactions: Arc<dyn TransactionManager>,
    ) -> Self {
        let family = Arc::new(FamilyServiceImpl::new(repositories.as_ref(), transactions));

        let authorizer: Arc<dyn AuthorizationService> = if config.auth_disabled {
            tracing::warn!("Authorization disabled: every operation is permitted");
            Arc::new(AllowAllAuthorizer)
        } else {
            Arc::new(RoleAuthorizer)
        };

        let schema = build_schema(family, authorizer, config.schema_limits);

        Self {
            config: Arc::new(config),
            schema,
            repositories,
        }
    }

    /// State backed by the in-memory adapters.
    pub fn in_memory(config: Config) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryRepositoryFactory::new()),
            Arc::new(InMemoryTransactionManager),
        )
    }
}

/// Build the full Axum router: /graphql, /health and layers.
/// Returns Router<()> (state fully applied) for use with axum::serve.
pub fn build_app(state: AppState) -> Router<()> {
    Router::new()
        .merge(api::graphql::router())
        .merge(api::health::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
