//! End-to-end tests through the Axum router with the in-memory adapters

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use jsonwebtoken::{EncodingKey, Header, encode};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

use family_service::context::RequestContext;
use family_service::domain::{DomainError, DomainResult};
use family_service::ports::{ChildRepository, ParentRepository, RepositoryFactory};
use family_service::repository::{InMemoryRepositoryFactory, InMemoryTransactionManager};
use family_service::{AppState, Config, build_app};

const SECRET: &str = "test-secret";

fn config(auth_disabled: bool) -> Config {
    Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some(SECRET.to_string()),
        "AUTH_DISABLED" => Some(auth_disabled.to_string()),
        _ => None,
    })
    .unwrap()
}

fn token(roles: &[&str]) -> String {
    let claims = json!({
        "sub": "user-1",
        "roles": roles,
        "exp": chrono::Utc::now().timestamp() + 3600,
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

async fn graphql(app: &axum::Router, bearer: Option<&str>, query: &str) -> Value {
    let mut request = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = bearer {
        request = request.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let request = request
        .body(Body::from(json!({ "query": query }).to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn first_error(body: &Value) -> &str {
    body["errors"][0]["message"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn test_family_lifecycle_as_admin() {
    let app = build_app(AppState::in_memory(config(false)));
    let admin = token(&["admin"]);

    let body = graphql(
        &app,
        Some(&admin),
        r#"mutation {
            createParent(input: { firstName: "John", lastName: "Doe", email: "John@Example.com", birthDate: "1980-01-01" }) { id email }
        }"#,
    )
    .await;
    assert!(body.get("errors").is_none(), "{body}");
    let parent_id = body["data"]["createParent"]["id"].as_str().unwrap().to_string();

    let body = graphql(
        &app,
        Some(&admin),
        &format!(
            r#"mutation {{
                createChild(input: {{ parentId: "{parent_id}", firstName: "Jane", lastName: "Doe", birthDate: "2010-06-15" }}) {{ id parentId }}
            }}"#
        ),
    )
    .await;
    assert!(body.get("errors").is_none(), "{body}");
    assert_eq!(body["data"]["createChild"]["parentId"], json!(parent_id));

    let body = graphql(
        &app,
        Some(&admin),
        &format!(
            r#"{{
                parent(id: "{parent_id}") {{ children {{ firstName }} }}
                childrenByParent(parentId: "{parent_id}") {{ totalCount }}
            }}"#
        ),
    )
    .await;
    assert!(body.get("errors").is_none(), "{body}");
    assert_eq!(
        body["data"],
        json!({
            "parent": { "children": [{ "firstName": "Jane" }] },
            "childrenByParent": { "totalCount": 1 }
        })
    );

    let body = graphql(
        &app,
        Some(&admin),
        &format!(r#"mutation {{ deleteParent(id: "{parent_id}") }}"#),
    )
    .await;
    assert_eq!(body["data"]["deleteParent"], json!(true));

    let body = graphql(&app, Some(&admin), "{ parents { totalCount } }").await;
    assert_eq!(body["data"]["parents"]["totalCount"], json!(0));
}

#[tokio::test]
async fn test_roles_gate_operations() {
    let app = build_app(AppState::in_memory(config(false)));

    let body = graphql(&app, None, "{ parents { totalCount } }").await;
    assert_eq!(first_error(&body), "not authorized to list parents");
    assert_eq!(body["data"]["parents"], Value::Null);

    let viewer = token(&["viewer"]);
    let body = graphql(&app, Some(&viewer), "{ parents { totalCount } }").await;
    assert!(body.get("errors").is_none(), "{body}");

    let body = graphql(
        &app,
        Some(&viewer),
        r#"mutation {
            createParent(input: { firstName: "A", lastName: "B", email: "a@b.co", birthDate: "1990-01-01" }) { id }
        }"#,
    )
    .await;
    assert_eq!(first_error(&body), "not authorized to create parent");
}

#[tokio::test]
async fn test_invalid_token_is_anonymous() {
    let app = build_app(AppState::in_memory(config(false)));

    let body = graphql(&app, Some("not.a.jwt"), "{ children { totalCount } }").await;
    assert_eq!(first_error(&body), "not authorized to list children");
}

#[tokio::test]
async fn test_auth_disabled_allows_anonymous() {
    let app = build_app(AppState::in_memory(config(true)));

    let body = graphql(&app, None, "{ children { totalCount } }").await;
    assert!(body.get("errors").is_none(), "{body}");
    assert_eq!(body["data"]["children"]["totalCount"], json!(0));
}

#[tokio::test]
async fn test_graphiql_only_for_browsers() {
    let app = build_app(AppState::in_memory(config(false)));

    let response = app
        .clone()
        .oneshot(
            Request::get("/graphql")
                .header(header::ACCEPT, "text/html")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::get("/graphql").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ============================================================================
// Health
// ============================================================================

async fn health(app: axum::Router) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_up() {
    let (status, body) = health(build_app(AppState::in_memory(config(false)))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["services"]["database"], json!("Up"));
    assert_eq!(body["version"], json!(env!("CARGO_PKG_VERSION")));
}

/// Factory whose storage is unreachable
struct UnreachableFactory(InMemoryRepositoryFactory);

#[async_trait]
impl RepositoryFactory for UnreachableFactory {
    fn parent_repository(&self) -> Arc<dyn ParentRepository> {
        self.0.parent_repository()
    }

    fn child_repository(&self) -> Arc<dyn ChildRepository> {
        self.0.child_repository()
    }

    async fn health_check(&self, _ctx: &RequestContext) -> DomainResult<()> {
        Err(DomainError::Transaction("connection refused".into()))
    }
}

#[tokio::test]
async fn test_health_degraded() {
    let state = AppState::new(
        config(false),
        Arc::new(UnreachableFactory(InMemoryRepositoryFactory::new())),
        Arc::new(InMemoryTransactionManager),
    );

    let (status, body) = health(build_app(state)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], json!("degraded"));
    assert_eq!(body["services"]["database"], json!("Down"));
}
