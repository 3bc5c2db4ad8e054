//! Shared harness for the GraphQL resolver tests
//!
//! Each test builds its own [Harness]: a schema wired to a scripted family
//! service and authorizer that record how they were called.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use family_service::context::{Principal, RequestContext};
use family_service::domain::query::page_bounds;
use family_service::domain::validation::parse_birth_date;
use family_service::domain::{
    Child, DomainError, DomainResult, FilterOptions, PagedResult, Parent, QueryOptions,
};
use family_service::graphql::{FamilySchema, SchemaLimits, build_schema};
use family_service::ports::{AuthorizationService, FamilyService};

pub const PARENT_ID: &str = "6f1c8a52-3b7e-4f0a-9d2c-1e5b7a9c3d40";
pub const CHILD_ID: &str = "0b9e2d71-5c4a-4e8f-8a13-7f6d2c9e1b05";

pub fn parent_id() -> Uuid {
    Uuid::parse_str(PARENT_ID).unwrap()
}

pub fn child_id() -> Uuid {
    Uuid::parse_str(CHILD_ID).unwrap()
}

pub fn sample_parent() -> Parent {
    Parent::new(
        parent_id(),
        "John",
        "Doe",
        "john@example.com",
        parse_birth_date("1980-01-01").unwrap(),
    )
    .unwrap()
}

pub fn sample_child() -> Child {
    Child::new(
        child_id(),
        "Jane",
        "Doe",
        parse_birth_date("2010-06-15").unwrap(),
        parent_id(),
    )
    .unwrap()
}

/// Family service returning canned data, or `error` when set.
#[derive(Default)]
pub struct MockFamilyService {
    calls: AtomicUsize,
    pub error: Mutex<Option<DomainError>>,
    pub parents: Mutex<Vec<Parent>>,
    pub children: Mutex<Vec<Child>>,
    pub updated_parent: Mutex<Option<Parent>>,
    pub updated_child: Mutex<Option<Child>>,
    pub last_options: Mutex<Option<QueryOptions>>,
}

impl MockFamilyService {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_with(&self, err: DomainError) {
        *self.error.lock() = Some(err);
    }

    fn enter(&self) -> DomainResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.error.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn parent(&self, id: Uuid) -> DomainResult<Parent> {
        self.parents
            .lock()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("parent", id))
    }

    fn child(&self, id: Uuid) -> DomainResult<Child> {
        self.children
            .lock()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("child", id))
    }

    fn page<T: Clone>(&self, items: &[T], options: QueryOptions) -> (Vec<T>, PagedResult) {
        let range = page_bounds(options.pagination, items.len());
        let page = items[range].to_vec();
        let paged = PagedResult::new(options.pagination, page.len(), items.len());
        *self.last_options.lock() = Some(options);
        (page, paged)
    }
}

#[async_trait]
impl FamilyService for MockFamilyService {
    async fn create_parent(
        &self,
        _ctx: &RequestContext,
        first_name: &str,
        last_name: &str,
        email: &str,
        birth_date: &str,
    ) -> DomainResult<Parent> {
        self.enter()?;
        let parent = Parent::new(
            Uuid::new_v4(),
            first_name,
            last_name,
            email,
            parse_birth_date(birth_date)?,
        )?;
        self.parents.lock().push(parent.clone());
        Ok(parent)
    }

    async fn get_parent_by_id(&self, _ctx: &RequestContext, id: Uuid) -> DomainResult<Parent> {
        self.enter()?;
        self.parent(id)
    }

    async fn update_parent(&self, _ctx: &RequestContext, parent: Parent) -> DomainResult<Parent> {
        self.enter()?;
        *self.updated_parent.lock() = Some(parent.clone());
        Ok(parent)
    }

    async fn delete_parent(&self, _ctx: &RequestContext, id: Uuid) -> DomainResult<()> {
        self.enter()?;
        self.parent(id).map(|_| ())
    }

    async fn list_parents(
        &self,
        _ctx: &RequestContext,
        options: QueryOptions,
    ) -> DomainResult<(Vec<Parent>, PagedResult)> {
        self.enter()?;
        let parents = self.parents.lock().clone();
        Ok(self.page(&parents, options))
    }

    async fn count_parents(
        &self,
        _ctx: &RequestContext,
        _filter: FilterOptions,
    ) -> DomainResult<usize> {
        self.enter()?;
        Ok(self.parents.lock().len())
    }

    async fn create_child(
        &self,
        _ctx: &RequestContext,
        parent_id: Uuid,
        first_name: &str,
        last_name: &str,
        birth_date: &str,
    ) -> DomainResult<Child> {
        self.enter()?;
        self.parent(parent_id)?;
        let child = Child::new(
            Uuid::new_v4(),
            first_name,
            last_name,
            parse_birth_date(birth_date)?,
            parent_id,
        )?;
        self.children.lock().push(child.clone());
        Ok(child)
    }

    async fn get_child_by_id(&self, _ctx: &RequestContext, id: Uuid) -> DomainResult<Child> {
        self.enter()?;
        self.child(id)
    }

    async fn update_child(&self, _ctx: &RequestContext, child: Child) -> DomainResult<Child> {
        self.enter()?;
        *self.updated_child.lock() = Some(child.clone());
        Ok(child)
    }

    async fn delete_child(&self, _ctx: &RequestContext, id: Uuid) -> DomainResult<()> {
        self.enter()?;
        self.child(id).map(|_| ())
    }

    async fn list_children(
        &self,
        _ctx: &RequestContext,
        options: QueryOptions,
    ) -> DomainResult<(Vec<Child>, PagedResult)> {
        self.enter()?;
        let children = self.children.lock().clone();
        Ok(self.page(&children, options))
    }

    async fn list_children_by_parent_id(
        &self,
        _ctx: &RequestContext,
        parent_id: Uuid,
        options: QueryOptions,
    ) -> DomainResult<(Vec<Child>, PagedResult)> {
        self.enter()?;
        self.parent(parent_id)?;
        let children: Vec<Child> = self
            .children
            .lock()
            .iter()
            .filter(|c| c.parent_id == Some(parent_id))
            .cloned()
            .collect();
        Ok(self.page(&children, options))
    }

    async fn count_children(
        &self,
        _ctx: &RequestContext,
        _filter: FilterOptions,
    ) -> DomainResult<usize> {
        self.enter()?;
        Ok(self.children.lock().len())
    }

    async fn add_child_to_parent(
        &self,
        _ctx: &RequestContext,
        parent_id: Uuid,
        child_id: Uuid,
    ) -> DomainResult<Parent> {
        self.enter()?;
        let mut parent = self.parent(parent_id)?;
        parent.upsert_child(self.child(child_id)?);
        Ok(parent)
    }

    async fn remove_child_from_parent(
        &self,
        _ctx: &RequestContext,
        parent_id: Uuid,
        child_id: Uuid,
    ) -> DomainResult<Parent> {
        self.enter()?;
        let mut parent = self.parent(parent_id)?;
        parent.remove_child(child_id);
        Ok(parent)
    }
}

/// Authorizer with a scripted decision that records each operation asked.
pub struct MockAuthorizer {
    pub decision: Mutex<DomainResult<bool>>,
    pub operations: Mutex<Vec<String>>,
}

impl Default for MockAuthorizer {
    fn default() -> Self {
        Self {
            decision: Mutex::new(Ok(true)),
            operations: Mutex::new(Vec::new()),
        }
    }
}

impl MockAuthorizer {
    pub fn deny(&self) {
        *self.decision.lock() = Ok(false);
    }

    pub fn fail_with(&self, err: DomainError) {
        *self.decision.lock() = Err(err);
    }

    pub fn operations(&self) -> Vec<String> {
        self.operations.lock().clone()
    }
}

#[async_trait]
impl AuthorizationService for MockAuthorizer {
    async fn is_authorized(&self, _ctx: &RequestContext, operation: &str) -> DomainResult<bool> {
        self.operations.lock().push(operation.to_string());
        self.decision.lock().clone()
    }
}

pub struct Harness {
    pub schema: FamilySchema,
    pub family: Arc<MockFamilyService>,
    pub authorizer: Arc<MockAuthorizer>,
}

impl Harness {
    pub fn new() -> Self {
        let family = Arc::new(MockFamilyService::default());
        let authorizer = Arc::new(MockAuthorizer::default());
        let schema = build_schema(family.clone(), authorizer.clone(), SchemaLimits::default());
        Self {
            schema,
            family,
            authorizer,
        }
    }

    /// Harness pre-seeded with [sample_parent] and [sample_child].
    pub fn seeded() -> Self {
        let harness = Self::new();
        harness.family.parents.lock().push(sample_parent());
        harness.family.children.lock().push(sample_child());
        harness
    }

    /// Execute as an authenticated admin.
    pub async fn execute(&self, query: &str) -> async_graphql::Response {
        let ctx = RequestContext::new(Some(Principal::new("tester", vec!["admin".into()])));
        self.schema
            .execute(async_graphql::Request::new(query).data(ctx))
            .await
    }

    /// Execute with a caller-supplied request context.
    pub async fn execute_with(&self, ctx: RequestContext, query: &str) -> async_graphql::Response {
        self.schema
            .execute(async_graphql::Request::new(query).data(ctx))
            .await
    }

    /// Execute with no request context attached.
    pub async fn execute_without_context(&self, query: &str) -> async_graphql::Response {
        self.schema.execute(query).await
    }
}

/// Messages of every error in the response
pub fn error_messages(response: &async_graphql::Response) -> Vec<String> {
    response.errors.iter().map(|e| e.message.clone()).collect()
}

pub fn data(response: async_graphql::Response) -> serde_json::Value {
    response.data.into_json().unwrap()
}
