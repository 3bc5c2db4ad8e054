//! Health check endpoint

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::app::AppState;
use crate::context::RequestContext;
use crate::graphql::types::format_timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComponentStatus {
    Up,
    Down,
}

#[derive(Serialize)]
pub struct ServiceStatuses {
    pub database: ComponentStatus,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub version: &'static str,
    pub services: ServiceStatuses,
}

/// Report overall health. Returns 503 when the repository probe fails.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let ctx = RequestContext::anonymous();

    let database = match state.repositories.health_check(&ctx).await {
        Ok(()) => ComponentStatus::Up,
        Err(e) => {
            tracing::warn!(error = %e, "Repository health check failed");
            ComponentStatus::Down
        }
    };

    let (code, status) = match database {
        ComponentStatus::Up => (StatusCode::OK, "healthy"),
        ComponentStatus::Down => (StatusCode::SERVICE_UNAVAILABLE, "degraded"),
    };

    (
        code,
        Json(HealthResponse {
            status,
            timestamp: format_timestamp(chrono::Utc::now()),
            version: env!("CARGO_PKG_VERSION"),
            services: ServiceStatuses { database },
        }),
    )
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
