//! Family Service - GraphQL API for parent and child records
//!
//! All operations are exposed via GraphQL at /graphql.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use family_service::config::{Config, LogFormat};
use family_service::{AppState, build_app};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "family_service=debug,tower_http=debug".into());

    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init(),
    }

    tracing::info!("Starting Family Service");
    tracing::info!(
        auth_disabled = config.auth_disabled,
        jwt_configured = config.jwt_secret.is_some(),
        "Configuration loaded"
    );

    let addr = config.bind_address();
    let state = AppState::in_memory(config);
    let app = build_app(state);

    tracing::info!("Listening on {}", addr);
    tracing::info!("GraphQL playground: http://{}/graphql", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
