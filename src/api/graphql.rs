//! GraphQL HTTP endpoint
//!
//! POST executes queries and mutations. GET serves GraphiQL to browsers and
//! a JSON hint to everything else.

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::Router;
use axum::extract::State;
use axum::http::header::{ACCEPT, AUTHORIZATION};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use tokio_util::sync::CancellationToken;

use crate::app::AppState;
use crate::context::{Principal, RequestContext};
use crate::graphql::verify_token;

/// Extract bearer token from Authorization header
fn extract_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Resolve the caller from the request headers. A missing secret or a token
/// that fails verification leaves the request anonymous.
fn principal_from_headers(state: &AppState, headers: &HeaderMap) -> Option<Principal> {
    let token = extract_token(headers)?;

    let Some(secret) = state.config.jwt_secret.as_deref() else {
        tracing::debug!("Bearer token ignored: JWT_SECRET is not configured");
        return None;
    };

    match verify_token(&token, secret) {
        Ok(principal) => Some(principal),
        Err(e) => {
            tracing::warn!(error = %e, "Rejected bearer token");
            None
        }
    }
}

/// GraphQL query/mutation handler with request context
async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let principal = principal_from_headers(&state, &headers);

    // Cancelled when the handler future is dropped (client went away)
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let ctx = RequestContext::with_token(principal, cancel);
    tracing::debug!(
        request_id = %ctx.request_id(),
        authenticated = ctx.principal().is_some(),
        "Executing GraphQL request"
    );

    let request = req.into_inner().data(ctx);
    state.schema.execute(request).await.into()
}

/// GraphiQL interactive playground (only for browsers)
async fn graphiql(headers: HeaderMap) -> impl IntoResponse {
    let accepts_html = headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/html"))
        .unwrap_or(false);

    if accepts_html {
        axum::response::Html(GraphiQLSource::build().endpoint("/graphql").finish()).into_response()
    } else {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            axum::Json(serde_json::json!({
                "error": "GET requests are not supported for GraphQL queries. Use POST with Content-Type: application/json"
            })),
        )
            .into_response()
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/graphql", get(graphiql).post(graphql_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_token(&headers).as_deref(), Some("abc.def"));
    }
}
